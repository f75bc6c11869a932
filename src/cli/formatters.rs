//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of tax computation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::tax::{LossCarry, SaleOutcome, TaxBucket};
use crate::utils::{format_currency, format_decimal_it, format_rate, format_unit_price_it};

const LABEL_WIDTH: usize = 34;

/// Format a sale outcome for JSON output.
///
/// Amounts are decimal strings at full precision.
pub fn format_outcome_json(outcome: &SaleOutcome) -> String {
    serde_json::to_string_pretty(outcome)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a sale outcome for terminal output
pub fn format_outcome_table(outcome: &SaleOutcome, show_allocations: bool) -> String {
    let r = &outcome.result;
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} Sale result - {} bucket ({})\n",
        "💶".cyan().bold(),
        outcome.bucket,
        format_rate(r.tax_rate)
    ));
    if let Some(date) = &outcome.sale_date {
        output.push_str(&format!("Sale date: {}\n", date));
    }
    output.push('\n');

    let line = |label: &str, value: String| format!("{} {}\n", pad(label).bold(), value);

    output.push_str(&line("Gross sale proceeds:", format_currency(r.gross_proceeds)));
    output.push_str(&line("Sale commission:", format_currency(r.sale_commission)));
    output.push_str(&line(
        "FIFO cost basis (total):",
        format_currency(r.total_cost_basis),
    ));
    output.push_str(&line(
        "Gain/loss before offset:",
        signed(r.realized_pnl, format_currency(r.realized_pnl)),
    ));
    output.push_str(&line("Losses used in offset:", format_currency(r.loss_used)));
    output.push_str(&line(
        &format!("Tax due ({}):", format_rate(r.tax_rate)),
        format_currency(r.tax_due),
    ));

    output.push_str(&format!("{}\n", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "{} {}\n",
        pad("Net cash after tax:").green().bold(),
        format_currency(r.net_cash).green().bold()
    ));

    if show_allocations {
        output.push_str(&format!("\n{} FIFO allocation by lot\n\n", "📄".cyan().bold()));
        output.push_str(&format_allocations(outcome));
        output.push('\n');
    }

    output.push_str(&format!("\n{} Loss position\n", "ℹ".blue().bold()));
    match outcome.carry {
        LossCarry::Residual(amount) => output.push_str(&format!(
            "  Residual available losses ({} bucket) after offset: {}\n",
            outcome.bucket,
            format_currency(amount).bold()
        )),
        LossCarry::NewLoss(amount) => output.push_str(&format!(
            "  New loss generated ({} bucket): {}\n",
            outcome.bucket,
            format_currency(amount).bold()
        )),
    }
    output.push_str(&format!(
        "\n{}\n",
        "Informational tool, not tax advice. Check the figures against your broker's tax statement."
            .bright_black()
    ));

    output
}

fn format_allocations(outcome: &SaleOutcome) -> String {
    if outcome.allocations.is_empty() {
        return "  No lots matched (nothing sold)".to_string();
    }

    #[derive(Tabled)]
    struct AllocationRow {
        #[tabled(rename = "Lot")]
        lot: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Qty sold")]
        quantity: String,
        #[tabled(rename = "Unit cost")]
        unit_cost: String,
        #[tabled(rename = "Commission")]
        commission: String,
        #[tabled(rename = "Cost basis")]
        cost_basis: String,
    }

    let rows: Vec<AllocationRow> = outcome
        .allocations
        .iter()
        .map(|chunk| AllocationRow {
            lot: (chunk.lot_position + 1).to_string(),
            date: chunk.lot_date.clone().unwrap_or_else(|| "-".to_string()),
            quantity: chunk.quantity_taken.to_string(),
            unit_cost: format_unit_price_it(chunk.unit_cost),
            commission: format_decimal_it(chunk.allocated_commission),
            cost_basis: format_decimal_it(chunk.cost_basis),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(2..), Alignment::right());
    table.to_string()
}

fn pad(label: &str) -> String {
    format!("{:<width$}", label, width = LABEL_WIDTH)
}

fn signed(value: Decimal, text: String) -> String {
    if value > Decimal::ZERO {
        text.green().to_string()
    } else if value < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

#[derive(Serialize)]
struct BucketInfo {
    bucket: TaxBucket,
    rate: Decimal,
    description: &'static str,
}

pub fn format_buckets_json() -> String {
    let buckets: Vec<BucketInfo> = TaxBucket::ALL
        .iter()
        .map(|b| BucketInfo {
            bucket: *b,
            rate: b.rate(),
            description: b.description(),
        })
        .collect();

    serde_json::to_string_pretty(&buckets)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

pub fn format_buckets_table() -> String {
    #[derive(Tabled)]
    struct BucketRow {
        #[tabled(rename = "Bucket")]
        bucket: String,
        #[tabled(rename = "Rate")]
        rate: String,
        #[tabled(rename = "Applies to")]
        description: String,
    }

    let rows: Vec<BucketRow> = TaxBucket::ALL
        .iter()
        .map(|b| BucketRow {
            bucket: b.as_str().to_string(),
            rate: format_rate(b.rate()),
            description: b.description().to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    format!(
        "{}\nLosses only offset gains of the same bucket.\n",
        table
    )
}
