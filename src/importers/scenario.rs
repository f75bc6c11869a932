use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::TaxError;
use crate::tax::{RawLot, SaleInput, SaleRequest, TaxBucket};

/// A sale scenario as written in a TOML file.
///
/// ```toml
/// bucket = "standard"
/// available_losses = "150.00"
///
/// [sale]
/// quantity = 70
/// unit_price = "12.50"
/// commission = "2.95"
/// date = "2025-03-14"
///
/// [[lots]]
/// date = "2023-05-02"
/// quantity = 50
/// unit_cost = "10.00"
/// commission = "5"
/// ```
///
/// Missing amounts default to zero; a missing bucket falls back to the
/// configured default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub bucket: Option<TaxBucket>,
    #[serde(default)]
    pub available_losses: Decimal,
    pub sale: SaleRequest,
    #[serde(default)]
    pub lots: Vec<RawLot>,
}

impl ScenarioFile {
    pub fn into_input(self, default_bucket: TaxBucket) -> SaleInput {
        SaleInput {
            lots: self.lots,
            sale: self.sale,
            bucket: self.bucket.unwrap_or(default_bucket),
            available_losses: self.available_losses,
        }
    }
}

pub fn parse_scenario(content: &str) -> Result<ScenarioFile, TaxError> {
    toml::from_str(content).map_err(|e| TaxError::ParseError(e.to_string()))
}

/// Read a scenario TOML file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioFile> {
    let path = path.as_ref();
    info!("Loading scenario from {:?}", path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {:?}", path))?;
    let scenario = parse_scenario(&content)
        .with_context(|| format!("Invalid scenario file {:?}", path))?;

    info!("Scenario has {} lots", scenario.lots.len());
    Ok(scenario)
}
