use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TaxError;

/// Italian capital-gains tax bucket of the security being sold.
///
/// Gains and losses only offset within the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TaxBucket {
    /// 12.5%: Italian/EU government bonds, white-list states, EU supranationals
    Reduced,
    /// 26%: shares, non-government ETFs/ETCs, corporate bonds and most others
    #[default]
    Standard,
}

impl TaxBucket {
    pub const ALL: [TaxBucket; 2] = [TaxBucket::Reduced, TaxBucket::Standard];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxBucket::Reduced => "REDUCED",
            TaxBucket::Standard => "STANDARD",
        }
    }

    /// Tax rate applied to the taxable gain
    pub fn rate(&self) -> Decimal {
        match self {
            TaxBucket::Reduced => Decimal::new(125, 3),
            TaxBucket::Standard => Decimal::new(26, 2),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TaxBucket::Reduced => "Italian/EU government bonds, white list and EU supranationals",
            TaxBucket::Standard => "Shares, non-government ETFs/ETCs, corporate bonds and others",
        }
    }
}

impl fmt::Display for TaxBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxBucket {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches('%').trim().to_ascii_uppercase();
        match normalized.as_str() {
            "REDUCED" | "12.5" | "12,5" => Ok(TaxBucket::Reduced),
            "STANDARD" | "26" => Ok(TaxBucket::Standard),
            _ => Err(TaxError::ValidationError(format!(
                "unknown tax bucket '{}' (use reduced/12.5 or standard/26)",
                s.trim()
            ))),
        }
    }
}

impl TryFrom<String> for TaxBucket {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for TaxBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Tax due on a taxable gain. Never negative: a zero or negative taxable
/// amount owes nothing and no rebate is modelled.
pub fn compute_tax(taxable_gain: Decimal, bucket: TaxBucket) -> Decimal {
    if taxable_gain <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    taxable_gain * bucket.rate()
}
