use rust_decimal::Decimal;
use serde::Serialize;

use super::lots::{total_quantity, Lot};
use crate::error::TaxError;

/// Portion of one purchase lot matched against the sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationChunk {
    /// Input row of the source lot (0-indexed)
    pub lot_position: usize,
    pub lot_date: Option<String>,
    pub quantity_taken: u64,
    pub unit_cost: Decimal,
    /// Share of the lot commission proportional to `quantity_taken`
    pub allocated_commission: Decimal,
    /// `quantity_taken * unit_cost + allocated_commission`
    pub cost_basis: Decimal,
}

/// Fail with `InsufficientInventory` when the lots cannot cover `quantity`
pub fn check_inventory(lots: &[Lot], quantity: u64) -> Result<(), TaxError> {
    let available = total_quantity(lots)?;
    if quantity > available {
        return Err(TaxError::InsufficientInventory {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

/// Match `quantity` units against lots already in FIFO order.
///
/// Each lot touched yields one chunk; the purchase commission follows the
/// units taken pro rata. Nothing is allocated when the lots do not hold
/// enough units.
pub fn allocate_fifo(lots: &[Lot], quantity: u64) -> Result<Vec<AllocationChunk>, TaxError> {
    check_inventory(lots, quantity)?;

    let mut remaining = quantity;
    let mut chunks = Vec::new();

    for lot in lots {
        if remaining == 0 {
            break;
        }

        let take = remaining.min(lot.quantity);
        let allocated_commission = allocate_commission(lot, take)?;
        let cost_basis = Decimal::from(take)
            .checked_mul(lot.unit_cost)
            .and_then(|cost| cost.checked_add(allocated_commission))
            .ok_or_else(|| {
                TaxError::out_of_range(&format!("cost basis of lot {}", lot.position + 1))
            })?;

        chunks.push(AllocationChunk {
            lot_position: lot.position,
            lot_date: lot.date.clone(),
            quantity_taken: take,
            unit_cost: lot.unit_cost,
            allocated_commission,
            cost_basis,
        });

        remaining -= take;
    }

    Ok(chunks)
}

fn allocate_commission(lot: &Lot, take: u64) -> Result<Decimal, TaxError> {
    if lot.quantity == 0 {
        return Ok(Decimal::ZERO);
    }
    if take == lot.quantity {
        return Ok(lot.commission);
    }
    let take = Decimal::from(take);
    let held = Decimal::from(lot.quantity);
    // Multiply before dividing so exact splits stay exact
    lot.commission
        .checked_mul(take)
        .map(|total| total / held)
        .or_else(|| (lot.commission / held).checked_mul(take))
        .ok_or_else(|| TaxError::out_of_range(&format!("commission of lot {}", lot.position + 1)))
}
