use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::formatters;
use super::{Cli, Commands, ComputeArgs};
use crate::config::Config;
use crate::importers::{load_scenario, parse_lot_spec, parse_lots_csv};
use crate::tax::{compute_sale, SaleInput, SaleRequest};

/// Execute a parsed command line and return the text to print
pub fn run(cli: &Cli) -> Result<String> {
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Compute(args) => run_compute(args, &config, cli.json),
        Commands::Buckets => Ok(if cli.json {
            formatters::format_buckets_json()
        } else {
            formatters::format_buckets_table()
        }),
    }
}

fn run_compute(args: &ComputeArgs, config: &Config, json_output: bool) -> Result<String> {
    let input = build_input(args, config)?;
    info!(
        "Computing sale of {} units against {} lots",
        input.sale.quantity,
        input.lots.len()
    );

    let outcome = compute_sale(&input)?;

    Ok(if json_output {
        formatters::format_outcome_json(&outcome)
    } else {
        formatters::format_outcome_table(&outcome, config.show_allocations && !args.no_allocations)
    })
}

/// Merge the scenario file, lot sources and flags into one input snapshot.
///
/// Flags override scenario values; lots from `--lots-csv` and `--lot` are
/// appended after the scenario's lots, in that order.
pub fn build_input(args: &ComputeArgs, config: &Config) -> Result<SaleInput> {
    let mut input = match &args.scenario {
        Some(path) => load_scenario(path)?.into_input(config.default_bucket),
        None => {
            let quantity = args
                .quantity
                .ok_or_else(|| anyhow!("Missing sale quantity: pass --quantity or --scenario"))?;
            let price = args
                .price
                .ok_or_else(|| anyhow!("Missing sale price: pass --price or --scenario"))?;
            SaleInput {
                lots: Vec::new(),
                sale: SaleRequest::new(quantity, price, Decimal::ZERO),
                bucket: config.default_bucket,
                available_losses: Decimal::ZERO,
            }
        }
    };

    if let Some(path) = &args.lots_csv {
        let lots = parse_lots_csv(path)
            .with_context(|| format!("Failed to import lots from {:?}", path))?;
        input.lots.extend(lots);
    }
    for spec in &args.lots {
        input.lots.push(parse_lot_spec(spec)?);
    }

    if let Some(quantity) = args.quantity {
        input.sale.quantity = quantity;
    }
    if let Some(price) = args.price {
        input.sale.unit_price = price;
    }
    if let Some(commission) = args.commission {
        input.sale.commission = commission;
    }
    if let Some(date) = &args.date {
        input.sale.date = Some(date.clone());
    }
    if let Some(bucket) = args.bucket {
        input.bucket = bucket;
    }
    if let Some(losses) = args.losses {
        input.available_losses = losses;
    }

    Ok(input)
}
