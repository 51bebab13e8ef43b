//! Fixed-point price type and integer quantities
//!
//! Prices use rust_decimal for deterministic arithmetic (no floating-point
//! errors) and a total order, so they can key the book's BTreeMaps directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order and trade size in whole units.
pub type Quantity = u64;

/// Basis points per unit (1 bps = 0.01%).
pub const BPS_PER_UNIT: u32 = 10_000;

/// A price in quote currency.
///
/// `Price::new` does not validate; validation of order prices is the job of
/// the order book at submission time. Use `try_new` where a strictly positive
/// price is required up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Strictly positive price, or None
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Midpoint between two prices
    pub fn midpoint(a: Price, b: Price) -> Decimal {
        (a.0 + b.0) / Decimal::TWO
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
        Decimal::from_str_exact(s).map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_non_positive() {
        assert!(Price::try_new(Decimal::ZERO).is_none());
        assert!(Price::try_new(Decimal::NEGATIVE_ONE).is_none());
        assert_eq!(Price::try_new(Decimal::ONE), Some(Price::from_u64(1)));
    }

    #[test]
    fn test_ordering_matches_decimal() {
        let low = Price::from_str("99.5").unwrap();
        let high = Price::from_u64(100);
        assert!(low < high);
        assert_eq!(Price::from_str("100.00").unwrap(), high);
    }

    #[test]
    fn test_midpoint() {
        let mid = Price::midpoint(Price::from_u64(49), Price::from_u64(51));
        assert_eq!(mid, Decimal::from(50));
    }

    #[test]
    fn test_price_serializes_as_string() {
        let price = Price::from_str("3000.50").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"3000.50\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
