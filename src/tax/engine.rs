//! Single-sale tax computation
//!
//! Runs the whole pipeline over one immutable input snapshot: lot
//! preparation, FIFO allocation, gain, loss offset, tax and net cash.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bucket::{compute_tax, TaxBucket};
use super::fifo::{allocate_fifo, AllocationChunk};
use super::gain::compute_gain;
use super::loss_offset::offset_losses;
use super::lots::{prepare_lots, RawLot};
use crate::error::TaxError;

/// The sale being evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaleRequest {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Decimal,
    /// Total commission paid on the sale
    #[serde(default)]
    pub commission: Decimal,
    /// Informational only
    #[serde(default)]
    pub date: Option<String>,
}

impl SaleRequest {
    pub fn new(quantity: i64, unit_price: Decimal, commission: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
            commission,
            date: None,
        }
    }
}

/// Everything needed to evaluate one sale
#[derive(Debug, Clone, PartialEq)]
pub struct SaleInput {
    pub lots: Vec<RawLot>,
    pub sale: SaleRequest,
    pub bucket: TaxBucket,
    /// Prior losses of the same bucket as the sale
    pub available_losses: Decimal,
}

/// Figures of one sale computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputationResult {
    pub gross_proceeds: Decimal,
    pub sale_commission: Decimal,
    pub net_proceeds_before_tax: Decimal,
    pub total_cost_basis: Decimal,
    pub realized_pnl: Decimal,
    pub loss_used: Decimal,
    pub taxable_gain: Decimal,
    pub tax_rate: Decimal,
    pub tax_due: Decimal,
    pub net_cash: Decimal,
    pub residual_losses: Decimal,
    pub new_carry_loss: Decimal,
}

/// Same-bucket loss state left after the sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum LossCarry {
    /// A gain was realized: prior losses left after the offset
    Residual(Decimal),
    /// A loss (or break-even) was realized: the new loss to carry forward
    NewLoss(Decimal),
}

/// Full outcome of a sale: the figures, the FIFO breakdown and the loss state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleOutcome {
    pub bucket: TaxBucket,
    pub sale_date: Option<String>,
    pub allocations: Vec<AllocationChunk>,
    pub result: ComputationResult,
    pub carry: LossCarry,
}

/// Compute net after-tax cash for a sale
pub fn compute_sale(input: &SaleInput) -> Result<SaleOutcome, TaxError> {
    let sale = &input.sale;
    validate_sale(sale, input.available_losses)?;
    let quantity = sale.quantity as u64;

    let lots = prepare_lots(&input.lots)?;
    let allocations = allocate_fifo(&lots, quantity)?;
    let gain = compute_gain(&allocations, quantity, sale.unit_price, sale.commission)?;
    let offset = offset_losses(gain.realized_pnl, input.available_losses);
    let tax_due = compute_tax(offset.taxable_gain, input.bucket);
    let net_cash = gain.net_proceeds_before_tax - tax_due.max(Decimal::ZERO);

    let carry = if gain.realized_pnl > Decimal::ZERO {
        LossCarry::Residual(offset.residual_losses)
    } else {
        LossCarry::NewLoss(offset.new_carry_loss)
    };

    debug!(
        "Sale of {} units ({}): pnl={} loss_used={} tax={} net_cash={}",
        quantity, input.bucket, gain.realized_pnl, offset.loss_used, tax_due, net_cash
    );

    Ok(SaleOutcome {
        bucket: input.bucket,
        sale_date: sale.date.clone(),
        allocations,
        result: ComputationResult {
            gross_proceeds: gain.gross_proceeds,
            sale_commission: sale.commission,
            net_proceeds_before_tax: gain.net_proceeds_before_tax,
            total_cost_basis: gain.total_cost_basis,
            realized_pnl: gain.realized_pnl,
            loss_used: offset.loss_used,
            taxable_gain: offset.taxable_gain,
            tax_rate: input.bucket.rate(),
            tax_due,
            net_cash,
            residual_losses: offset.residual_losses,
            new_carry_loss: offset.new_carry_loss,
        },
        carry,
    })
}

fn validate_sale(sale: &SaleRequest, available_losses: Decimal) -> Result<(), TaxError> {
    if sale.quantity < 0 {
        return Err(TaxError::ValidationError(format!(
            "sale quantity is negative ({})",
            sale.quantity
        )));
    }
    if sale.unit_price < Decimal::ZERO {
        return Err(TaxError::ValidationError(format!(
            "sale price is negative ({})",
            sale.unit_price
        )));
    }
    if sale.commission < Decimal::ZERO {
        return Err(TaxError::ValidationError(format!(
            "sale commission is negative ({})",
            sale.commission
        )));
    }
    if available_losses < Decimal::ZERO {
        return Err(TaxError::ValidationError(format!(
            "available losses are negative ({})",
            available_losses
        )));
    }
    Ok(())
}
