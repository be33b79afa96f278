//! Money type for representing monetary values.
//!
//! The storefront trades in a single currency (Indian rupees). Amounts are
//! held in paise so that pricing arithmetic stays exact; documents persist
//! them as plain numbers of rupees, which is what every screen and the
//! order history already store.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// ISO 4217 code of the store currency.
pub const CURRENCY_CODE: &str = "INR";

/// Display symbol of the store currency.
pub const CURRENCY_SYMBOL: &str = "\u{20b9}";

const MINOR_PER_MAJOR: i64 = 100;

/// A monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    paise: i64,
}

impl Money {
    /// Zero rupees.
    pub const ZERO: Money = Money { paise: 0 };

    /// Create a value from paise.
    pub const fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    /// Create a value from whole rupees.
    pub const fn from_rupees(rupees: i64) -> Self {
        Self {
            paise: rupees.saturating_mul(MINOR_PER_MAJOR),
        }
    }

    /// Create a value from a decimal rupee amount, rounding to the nearest paisa.
    ///
    /// Non-finite input (NaN, infinities) becomes zero so that a corrupt price
    /// never poisons a total.
    ///
    /// ```
    /// use amcros_commerce::money::Money;
    /// assert_eq!(Money::from_decimal(5.99).paise(), 599);
    /// assert_eq!(Money::from_decimal(f64::NAN), Money::ZERO);
    /// ```
    pub fn from_decimal(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Self::ZERO;
        }
        Self::from_paise((rupees * MINOR_PER_MAJOR as f64).round() as i64)
    }

    /// Amount in paise.
    pub const fn paise(&self) -> i64 {
        self.paise
    }

    /// Amount in rupees as a float, for persistence and display.
    pub fn to_decimal(&self) -> f64 {
        self.paise as f64 / MINOR_PER_MAJOR as f64
    }

    pub fn is_zero(&self) -> bool {
        self.paise == 0
    }

    pub fn is_negative(&self) -> bool {
        self.paise < 0
    }

    /// Multiply by a quantity, saturating on overflow.
    pub fn times(&self, quantity: u32) -> Money {
        Money::from_paise(self.paise.saturating_mul(i64::from(quantity)))
    }

    /// Take a rate expressed in basis points (1/100 of a percent), rounding
    /// half away from zero to the nearest paisa.
    pub fn basis_points(&self, bps: u32) -> Money {
        let scaled = i128::from(self.paise) * i128::from(bps);
        let half = 5_000_i128;
        let rounded = if scaled >= 0 {
            (scaled + half) / 10_000
        } else {
            (scaled - half) / 10_000
        };
        Money::from_paise(rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    /// Format with the currency symbol, e.g. `₹216.00`.
    pub fn display(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.display_amount())
    }

    /// Format without the symbol, e.g. `216.00`.
    pub fn display_amount(&self) -> String {
        let sign = if self.paise < 0 { "-" } else { "" };
        let abs = self.paise.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        format!("{}{}.{:02}", sign, abs / per, abs % per)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_paise(self.paise.saturating_add(other.paise))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_paise(self.paise.saturating_sub(other.paise))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

/// Accepts numbers, numeric strings and nulls; anything else is read as zero.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientMoneyVisitor)
    }
}

struct LenientMoneyVisitor;

impl<'de> Visitor<'de> for LenientMoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a rupee amount")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::from_rupees(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money::from_rupees(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Ok(Money::from_decimal(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Ok(v.trim()
            .parse::<f64>()
            .map(Money::from_decimal)
            .unwrap_or(Money::ZERO))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(LenientMoneyVisitor)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Money, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Money::ZERO)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Money, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(Money::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).paise(), 4999);
        assert_eq!(Money::from_decimal(250.0).paise(), 25000);
        assert_eq!(Money::from_decimal(f64::INFINITY), Money::ZERO);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_paise(21600).display(), "\u{20b9}216.00");
        assert_eq!(Money::from_paise(599).display_amount(), "5.99");
        assert_eq!(Money::from_paise(-5).display_amount(), "-0.05");
    }

    #[test]
    fn test_basis_points_rounds_half_up() {
        // 8% of 200.00
        assert_eq!(Money::from_rupees(200).basis_points(800), Money::from_rupees(16));
        // 8% of 0.06 = 0.0048 -> 0.00
        assert_eq!(Money::from_paise(6).basis_points(800), Money::ZERO);
        // 8% of 0.07 = 0.0056 -> 0.01
        assert_eq!(Money::from_paise(7).basis_points(800), Money::from_paise(1));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_paise(550);
        assert_eq!((a + b).paise(), 1550);
        assert_eq!((a - b).paise(), 450);
        assert_eq!((b * 3).paise(), 1650);
        let total: Money = vec![a, b].into_iter().sum();
        assert_eq!(total.paise(), 1550);
    }

    #[test]
    fn test_lenient_deserialize() {
        let parse = |s: &str| serde_json::from_str::<Money>(s).unwrap();
        assert_eq!(parse("250"), Money::from_rupees(250));
        assert_eq!(parse("5.99"), Money::from_paise(599));
        assert_eq!(parse("\"300\""), Money::from_rupees(300));
        assert_eq!(parse("\"abc\""), Money::ZERO);
        assert_eq!(parse("null"), Money::ZERO);
        assert_eq!(parse("{\"amount\": 3}"), Money::ZERO);
    }

    #[test]
    fn test_serializes_as_rupees() {
        let json = serde_json::to_string(&Money::from_paise(21600)).unwrap();
        assert_eq!(json, "216.0");
    }
}
