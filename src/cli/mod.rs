use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::tax::TaxBucket;
use crate::utils::parse_decimal_it;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "plusvalenze")]
#[command(version, about = "Net cash after Italian capital-gains tax on a sale")]
#[command(
    long_about = "Compute what you actually receive when selling a security in Italy: FIFO matching of purchase lots, pro-rata commissions, offset of prior same-bucket losses, and tax at 12.5% (government bonds) or 26% (everything else)."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a config file (defaults to <config dir>/plusvalenze/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute gain, tax and net cash for a sale
    Compute(ComputeArgs),

    /// List tax buckets and their rates
    Buckets,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ComputeArgs {
    /// Scenario TOML file with lots, sale, bucket and available losses
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// CSV file of purchase lots (Data;Quantità;Prezzo di acquisto;Commissione acquisto)
    #[arg(long = "lots-csv")]
    pub lots_csv: Option<PathBuf>,

    /// Purchase lot as QTY:COST[:COMMISSION[:DATE]] (repeatable)
    #[arg(short, long = "lot", allow_hyphen_values = true)]
    pub lots: Vec<String>,

    /// Quantity sold
    #[arg(short, long, allow_hyphen_values = true)]
    pub quantity: Option<i64>,

    /// Unit sale price
    #[arg(short, long, value_parser = parse_decimal_arg, allow_hyphen_values = true)]
    pub price: Option<Decimal>,

    /// Total sale commission
    #[arg(short, long, value_parser = parse_decimal_arg, allow_hyphen_values = true)]
    pub commission: Option<Decimal>,

    /// Sale date (informational)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Tax bucket of the security: reduced (12.5%) or standard (26%)
    #[arg(short, long)]
    pub bucket: Option<TaxBucket>,

    /// Prior losses available in the same bucket
    #[arg(long, value_parser = parse_decimal_arg, allow_hyphen_values = true)]
    pub losses: Option<Decimal>,

    /// Hide the per-lot FIFO breakdown
    #[arg(long)]
    pub no_allocations: bool,
}

/// Decimal command-line values, accepting `12.50` or `12,50`
fn parse_decimal_arg(s: &str) -> Result<Decimal, String> {
    parse_decimal_it(s).ok_or_else(|| format!("invalid amount '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compute_flags() {
        let cli = Cli::try_parse_from([
            "plusvalenze",
            "--json",
            "compute",
            "--lot",
            "50:10:5",
            "--lot",
            "50:8:5",
            "-q",
            "70",
            "--price",
            "12,50",
            "--bucket",
            "12.5",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Compute(args) => {
                assert_eq!(args.lots, vec!["50:10:5", "50:8:5"]);
                assert_eq!(args.quantity, Some(70));
                assert_eq!(args.price, Some(dec!(12.50)));
                assert_eq!(args.bucket, Some(TaxBucket::Reduced));
                assert_eq!(args.losses, None);
            }
            _ => panic!("expected compute"),
        }
    }

    #[test]
    fn test_invalid_amount_is_rejected() {
        let result = Cli::try_parse_from(["plusvalenze", "compute", "--price", "dodici"]);
        assert!(result.is_err());
    }
}
