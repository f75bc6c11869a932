//! Plusvalenze - net cash after Italian capital-gains tax
//!
//! This library computes what a sale of a security actually yields under
//! Italian rules: FIFO matching of purchase lots, pro-rata commissions,
//! offset of prior same-bucket losses and tax at the bucket rate.

pub mod cli;
pub mod config;
pub mod error;
pub mod importers;
pub mod tax;
pub mod utils;
