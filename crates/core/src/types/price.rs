//! Unit and line prices.
//!
//! Prices are kept as [`Decimal`] so that `unit × quantity` is exact, and go
//! over the wire as plain JSON numbers because the backend's order schema
//! stores them as `Number`.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in the backend's currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Unit price used for every synthetic order line.
    pub const UNIT: Self = Self(Decimal::from_parts(99, 0, 0, false, 0));

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn whole(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` items at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_price_is_99() {
        assert_eq!(Price::UNIT, Price::whole(99));
    }

    #[test]
    fn test_times_multiplies_exactly() {
        assert_eq!(Price::UNIT.times(3), Price::whole(297));
        assert_eq!(Price::UNIT.times(1), Price::UNIT);
    }

    #[test]
    fn test_serializes_as_json_number() {
        let value = serde_json::to_value(Price::UNIT.times(2)).unwrap();
        assert_eq!(value.as_f64(), Some(198.0));
    }
}
