// Tax module - Italian capital-gains computation for a single sale (FIFO, 12.5%/26% buckets)

pub mod bucket;
pub mod engine;
pub mod fifo;
pub mod gain;
pub mod loss_offset;
pub mod lots;

pub use bucket::{compute_tax, TaxBucket};
pub use engine::{compute_sale, ComputationResult, LossCarry, SaleInput, SaleOutcome, SaleRequest};
pub use fifo::{allocate_fifo, check_inventory, AllocationChunk};
pub use gain::{compute_gain, GainSummary};
pub use loss_offset::{offset_losses, LossOffset};
pub use lots::{parse_lot_date, prepare_lots, total_quantity, Lot, RawLot};
