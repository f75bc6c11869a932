use rust_decimal::Decimal;

/// Outcome of offsetting prior same-bucket losses against a realized P/L
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LossOffset {
    pub loss_used: Decimal,
    pub taxable_gain: Decimal,
    /// Prior losses still available after this sale
    pub residual_losses: Decimal,
    /// Loss realized by this sale, carried forward in the same bucket
    pub new_carry_loss: Decimal,
}

/// Apply available losses to a realized P/L, up to the gain's capacity.
///
/// Losses must already belong to the sale's bucket; no bucket check happens
/// here. A realized loss is reported on its own as `new_carry_loss` and is
/// never merged into `available_losses`.
pub fn offset_losses(realized_pnl: Decimal, available_losses: Decimal) -> LossOffset {
    if realized_pnl > Decimal::ZERO {
        let loss_used = realized_pnl.min(available_losses);
        LossOffset {
            loss_used,
            taxable_gain: realized_pnl - loss_used,
            residual_losses: available_losses - loss_used,
            new_carry_loss: Decimal::ZERO,
        }
    } else {
        LossOffset {
            loss_used: Decimal::ZERO,
            taxable_gain: Decimal::ZERO,
            residual_losses: available_losses,
            new_carry_loss: realized_pnl.abs(),
        }
    }
}
