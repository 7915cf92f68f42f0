//! Precision-safe decimal types for order quantities and prices.
//!
//! Uses `rust_decimal` for exact decimal arithmetic so that slice sizes and
//! volume-weighted averages are free of binary floating-point drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Plain (`"0.5"`) or scientific (`"5e-1"`) decimal notation.
///
/// Digit-group underscores are rejected even though `Decimal::from_str`
/// tolerates them.
pub fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let raw = raw.trim();
    if raw.contains('_') {
        return Err(rust_decimal::Error::ErrorString(format!("unexpected '_' in {raw:?}")));
    }
    Decimal::from_str(raw).or_else(|e| {
        if raw.contains(['e', 'E']) {
            Decimal::from_scientific(raw)
        } else {
            Err(e)
        }
    })
}

/// Price with exact decimal precision.
///
/// Wraps `Decimal` so prices cannot be mixed up with quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Round half-to-even to `dp` decimal places.
    #[inline]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }

    /// Query-string form: trailing zeros stripped.
    pub fn to_wire(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Quantity with exact decimal precision.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Round down to lot size.
    #[inline]
    pub fn round_to_lot(&self, lot_size: Size) -> Self {
        if lot_size.is_zero() {
            return *self;
        }
        Self((self.0 / lot_size.0).floor() * lot_size.0)
    }

    /// Equal share of this size across `parts`. Returns zero for zero parts.
    #[inline]
    pub fn split(&self, parts: u32) -> Self {
        if parts == 0 {
            return Self::ZERO;
        }
        Self(self.0 / Decimal::from(parts))
    }

    /// Calculate notional value: size * price.
    #[inline]
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }

    /// Query-string form: trailing zeros stripped.
    pub fn to_wire(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Self)
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Size {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, s| acc + s)
    }
}
