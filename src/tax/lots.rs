use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TaxError;

/// Accepted lot date formats, tried in order
pub const LOT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Purchase lot as entered by the user, before validation.
///
/// Quantity is signed so negative input can be rejected instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLot {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_cost: Decimal,
    /// Commission paid on the whole lot
    #[serde(default)]
    pub commission: Decimal,
}

impl RawLot {
    pub fn new(quantity: i64, unit_cost: Decimal, commission: Decimal) -> Self {
        Self {
            date: None,
            quantity,
            unit_cost,
            commission,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Validated purchase lot, ready for FIFO allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lot {
    /// Row of the lot in the input (0-indexed)
    pub position: usize,
    /// Date label exactly as entered
    pub date: Option<String>,
    /// `None` sorts before every parsed date
    pub order_key: Option<NaiveDate>,
    pub quantity: u64,
    pub unit_cost: Decimal,
    pub commission: Decimal,
}

/// Parse a lot date in any accepted format.
///
/// Returns `None` for blank or unrecognised strings; the lot then sorts as
/// the earliest one.
pub fn parse_lot_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    LOT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Validate raw lots and return them in FIFO order.
///
/// Lots with zero quantity are dropped. Undated lots and lots whose date
/// cannot be parsed come first; ties keep their input order.
pub fn prepare_lots(raw: &[RawLot]) -> Result<Vec<Lot>, TaxError> {
    let mut lots = Vec::with_capacity(raw.len());

    for (position, entry) in raw.iter().enumerate() {
        let row = position + 1;
        if entry.quantity < 0 {
            return Err(TaxError::ValidationError(format!(
                "lot {}: quantity is negative ({})",
                row, entry.quantity
            )));
        }
        if entry.unit_cost < Decimal::ZERO {
            return Err(TaxError::ValidationError(format!(
                "lot {}: unit cost is negative ({})",
                row, entry.unit_cost
            )));
        }
        if entry.commission < Decimal::ZERO {
            return Err(TaxError::ValidationError(format!(
                "lot {}: commission is negative ({})",
                row, entry.commission
            )));
        }

        if entry.quantity == 0 {
            debug!("Skipping lot {} with zero quantity", row);
            continue;
        }

        let date = entry
            .date
            .as_ref()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let order_key = date.as_deref().and_then(parse_lot_date);
        if let (Some(label), None) = (&date, order_key) {
            warn!(
                "Lot {}: unrecognised date '{}', treating it as the earliest lot",
                row, label
            );
        }

        lots.push(Lot {
            position,
            date,
            order_key,
            quantity: entry.quantity as u64,
            unit_cost: entry.unit_cost,
            commission: entry.commission,
        });
    }

    // Stable sort keeps input order between equal keys
    lots.sort_by_key(|lot| lot.order_key);

    debug!("Prepared {} lots from {} input rows", lots.len(), raw.len());
    Ok(lots)
}

/// Total quantity held across lots
pub fn total_quantity(lots: &[Lot]) -> Result<u64, TaxError> {
    lots.iter()
        .try_fold(0u64, |total, lot| total.checked_add(lot.quantity))
        .ok_or_else(|| TaxError::out_of_range("total lot quantity"))
}
