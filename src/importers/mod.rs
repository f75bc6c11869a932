// Import module - scenario TOML files, purchase-lot CSV files and inline lot specs

pub mod lots_csv;
pub mod scenario;

use crate::error::TaxError;
use crate::tax::RawLot;
use crate::utils::parse_decimal_it;

pub use lots_csv::parse_lots_csv;
pub use scenario::{load_scenario, parse_scenario, ScenarioFile};

/// Parse an inline lot given on the command line: `QTY:COST[:COMMISSION[:DATE]]`.
///
/// Decimals may use either `.` or `,`. The date is kept as a label and
/// parsed later by the lot store.
pub fn parse_lot_spec(spec: &str) -> Result<RawLot, TaxError> {
    let invalid = |reason: &str| {
        TaxError::ValidationError(format!(
            "invalid lot '{}': {} (expected QTY:COST[:COMMISSION[:DATE]])",
            spec, reason
        ))
    };

    let mut parts = spec.splitn(4, ':').map(str::trim);

    let quantity = parts
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| invalid("missing quantity"))?
        .parse::<i64>()
        .map_err(|_| invalid("quantity must be a whole number"))?;
    let unit_cost = parts
        .next()
        .and_then(parse_decimal_it)
        .ok_or_else(|| invalid("missing or invalid unit cost"))?;
    let mut lot = RawLot::new(quantity, unit_cost, rust_decimal::Decimal::ZERO);

    if let Some(commission) = parts.next().filter(|p| !p.is_empty()) {
        lot.commission =
            parse_decimal_it(commission).ok_or_else(|| invalid("invalid commission"))?;
    }
    if let Some(date) = parts.next().filter(|p| !p.is_empty()) {
        lot = lot.with_date(date);
    }

    Ok(lot)
}
