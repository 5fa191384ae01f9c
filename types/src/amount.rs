//! Token-unit amounts for balances and voting weights.
//!
//! Amounts are fixed-point integers (u128) with 18 decimals, so `1 * UNIT` is
//! one whole token. Voting weights use the same representation as balances.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Raw units per whole token.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// A token amount or voting weight in raw units.
///
/// Human-readable formats get a decimal string so that values above
/// `i64::MAX` survive TOML and JSON; deserialization there accepts either a
/// string or an integer. Binary formats store the raw `u128`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole tokens to raw units. Saturates at `u128::MAX`.
    pub fn from_units(units: u128) -> Self {
        Self(units.saturating_mul(UNIT))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().replace('_', "").parse::<u128>().map(Self)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(&self.0)
        } else {
            serializer.serialize_u128(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> serde::de::Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a non-negative integer or decimal string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Amount(v as u128))
            }

            fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<Self::Value, E> {
                Ok(Amount(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u128::try_from(v)
                    .map(Amount)
                    .map_err(|_| E::custom("amount must not be negative"))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(AmountVisitor)
        } else {
            u128::deserialize(deserializer).map(Amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_units_scales_by_unit() {
        assert_eq!(Amount::from_units(15).raw(), 15 * UNIT);
        assert_eq!(Amount::from_units(u128::MAX).raw(), u128::MAX);
    }

    #[test]
    fn checked_arithmetic() {
        let a = Amount::from_units(20);
        let b = Amount::from_units(10);
        assert_eq!(a.checked_add(b), Some(Amount::from_units(30)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(b.saturating_sub(a), Amount::ZERO);
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn parses_underscored_decimal() {
        assert_eq!("1_000".parse::<Amount>().unwrap(), Amount::new(1000));
        assert!("-5".parse::<Amount>().is_err());
    }

    #[test]
    fn json_accepts_string_and_number() {
        let from_str: Amount = serde_json::from_str("\"20000000000000000000\"").unwrap();
        assert_eq!(from_str, Amount::from_units(20));
        let from_num: Amount = serde_json::from_str("42").unwrap();
        assert_eq!(from_num, Amount::new(42));
        assert!(serde_json::from_str::<Amount>("-1").is_err());
        assert_eq!(
            serde_json::to_string(&Amount::from_units(1)).unwrap(),
            "\"1000000000000000000\""
        );
    }
}
