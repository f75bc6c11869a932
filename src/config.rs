//! User configuration
//!
//! Optional `config.toml` under the platform config directory
//! (`<config_home>/plusvalenze/config.toml`). A missing file means defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::tax::TaxBucket;

/// Environment variable overriding `default_bucket`
pub const BUCKET_ENV: &str = "PLUSVALENZE_BUCKET";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bucket used when neither the scenario nor the command line names one
    pub default_bucket: TaxBucket,
    /// Print the per-lot FIFO breakdown table
    pub show_allocations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_bucket: TaxBucket::Standard,
            show_allocations: true,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dir_spec::config_home().map(|dir| dir.join("plusvalenze").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`,
    /// then apply the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(value) = std::env::var(BUCKET_ENV) {
            config.apply_bucket_override(&value)?;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_bucket_override(&mut self, value: &str) -> Result<()> {
        self.default_bucket = value
            .parse()
            .with_context(|| format!("Invalid {} value", BUCKET_ENV))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_bucket, TaxBucket::Standard);
        assert!(config.show_allocations);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str("default_bucket = \"reduced\"\n").unwrap();
        assert_eq!(config.default_bucket, TaxBucket::Reduced);
        assert!(config.show_allocations);

        let config = Config::from_toml_str("show_allocations = false").unwrap();
        assert_eq!(config.default_bucket, TaxBucket::Standard);
        assert!(!config.show_allocations);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_toml_str("default_bucket = \"20%\"").is_err());
        assert!(Config::from_toml_str("colour = true").is_err());
    }

    #[test]
    fn test_bucket_override() {
        let mut config = Config::default();
        config.apply_bucket_override("12,5").unwrap();
        assert_eq!(config.default_bucket, TaxBucket::Reduced);
        assert!(config.apply_bucket_override("nope").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_bucket = \"12.5\"").unwrap();
        writeln!(file, "show_allocations = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.default_bucket, TaxBucket::Reduced);
        assert!(!config.show_allocations);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
