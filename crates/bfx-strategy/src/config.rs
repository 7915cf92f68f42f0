//! Strategy defaults, overridable from the app config.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Orders per side.
    #[serde(default = "default_levels")]
    pub levels: u32,
    /// Spacing between levels, as a percentage of the reference price.
    #[serde(default = "default_profit_percent")]
    pub profit_percent: Decimal,
    /// Decimal places ladder prices are rounded to.
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u32,
}

fn default_levels() -> u32 {
    10
}

fn default_profit_percent() -> Decimal {
    Decimal::new(5, 1)
}

fn default_price_decimals() -> u32 {
    2
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            profit_percent: default_profit_percent(),
            price_decimals: default_price_decimals(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwapConfig {
    #[serde(default = "default_intervals")]
    pub intervals: u32,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
}

fn default_intervals() -> u32 {
    10
}

fn default_duration_secs() -> u64 {
    300
}

impl Default for TwapConfig {
    fn default() -> Self {
        Self {
            intervals: default_intervals(),
            duration_secs: default_duration_secs(),
        }
    }
}
