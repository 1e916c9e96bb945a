//! Business constants for the profit calculators.
//!
//! Prices and fixed costs are operator lore, not derived numbers; they are
//! kept in a YAML file next to the database so they can be corrected without
//! a rebuild. Every field has a default matching the historical books, so a
//! missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Barber shop rates.
///
/// Historically the books priced a child haircut at 80 in the profit totals
/// but at 100 in the per-day report columns. Nobody has settled which one is
/// right, so both are kept configurable instead of hard-coding a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarberRates {
    pub adult_price: i64,
    pub child_price: i64,
    pub child_price_reporting: i64,
    pub free_price: i64,
    /// Revenue is split before costs come off; the divisor is part of the
    /// books, not something this system derives.
    pub revenue_divisor: i64,
    pub fixed_cost: i64,
}

impl Default for BarberRates {
    fn default() -> Self {
        Self {
            adult_price: 120,
            child_price: 80,
            child_price_reporting: 100,
            free_price: 0,
            revenue_divisor: 2,
            fixed_cost: 260,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoeRates {
    pub fixed_cost: i64,
}

impl Default for ShoeRates {
    fn default() -> Self {
        Self { fixed_cost: 110 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeatballRates {
    pub sales_divisor: i64,
    pub fixed_cost: i64,
}

impl Default for MeatballRates {
    fn default() -> Self {
        Self {
            sales_divisor: 2,
            fixed_cost: 200,
        }
    }
}

/// All configurable business constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitConfig {
    pub barber: BarberRates,
    pub shoe: ShoeRates,
    pub meatball: MeatballRates,
}

impl ProfitConfig {
    /// Load rates from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load rates from the given path, falling back to defaults when no path
    /// is configured or the file does not exist yet.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if Path::new(p).exists() => Self::from_file(p),
            _ => Ok(Self::default()),
        }
    }
}
