use rust_decimal::Decimal;

use super::fifo::AllocationChunk;
use crate::error::TaxError;

/// Proceeds and realized P/L of a sale before any loss offset or tax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GainSummary {
    pub gross_proceeds: Decimal,
    pub net_proceeds_before_tax: Decimal,
    pub total_cost_basis: Decimal,
    /// Positive for a gain, negative for a loss
    pub realized_pnl: Decimal,
}

/// Aggregate the FIFO cost basis and compare it with the sale proceeds.
///
/// The sale commission reduces proceeds once, in aggregate; it is never
/// spread across lots.
pub fn compute_gain(
    chunks: &[AllocationChunk],
    quantity: u64,
    unit_price: Decimal,
    sale_commission: Decimal,
) -> Result<GainSummary, TaxError> {
    let total_cost_basis = chunks
        .iter()
        .try_fold(Decimal::ZERO, |total, c| total.checked_add(c.cost_basis))
        .ok_or_else(|| TaxError::out_of_range("total cost basis"))?;
    let gross_proceeds = Decimal::from(quantity)
        .checked_mul(unit_price)
        .ok_or_else(|| TaxError::out_of_range("gross sale proceeds"))?;
    let net_proceeds_before_tax = gross_proceeds
        .checked_sub(sale_commission)
        .ok_or_else(|| TaxError::out_of_range("net sale proceeds"))?;
    let realized_pnl = net_proceeds_before_tax
        .checked_sub(total_cost_basis)
        .ok_or_else(|| TaxError::out_of_range("realized gain or loss"))?;

    Ok(GainSummary {
        gross_proceeds,
        net_proceeds_before_tax,
        total_cost_basis,
        realized_pnl,
    })
}
