//! Error handling for plusvalenze
//!
//! Defines the domain error type raised by the tax pipeline and establishes a
//! unified Result type using anyhow for context chaining in the input and CLI
//! layers.

use thiserror::Error;

/// Errors that stop a sale computation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxError {
    /// Negative quantity, price, commission or loss amount (or otherwise
    /// malformed input value)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The sale asks for more units than the lots hold
    #[error(
        "insufficient inventory: selling {requested} units but only {available} held. \
         Reduce the quantity sold or update the purchase lots"
    )]
    InsufficientInventory { requested: u64, available: u64 },

    /// Unreadable scenario or lot file content
    #[error("parse error: {0}")]
    ParseError(String),
}

impl TaxError {
    /// An amount too large to represent exactly
    pub fn out_of_range(what: &str) -> Self {
        TaxError::ValidationError(format!("amount out of range: {}", what))
    }
}

/// Result type alias for the input and CLI layers
pub type Result<T> = anyhow::Result<T>;
