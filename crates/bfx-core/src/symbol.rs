//! Instrument symbol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Venue symbol, e.g. `BTCUSDT`.
///
/// Always non-empty ASCII alphanumerics, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Accepts `raw` when it is a non-empty run of ASCII letters and digits.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| CoreError::validation("symbol", raw))
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
