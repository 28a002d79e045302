use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------       Money       -----------------------------------------------------------
/// A fixed-point monetary amount with two fractional digits, stored as integer cents.
///
/// On the wire, `Money` is a decimal string (`"12.34"`), which is how menu prices appear in
/// request and response bodies. Numeric JSON input is accepted as well.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(pub String);

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl Money {
    /// The raw value in cents.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_whole(units: i64) -> Self {
        Self(units * 100)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || MoneyConversionError(s.to_string());
        let (s, sign) = match s.strip_prefix('-') {
            Some(rest) => (rest, -1),
            None => (s, 1),
        };
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(err());
        }
        let whole = whole.parse::<i64>().map_err(|_| err())?;
        let frac = match frac {
            "" => 0,
            f => {
                let v = f.parse::<i64>().map_err(|_| err())?;
                if f.len() == 1 {
                    v * 10
                } else {
                    v
                }
            },
        };
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .map(|cents| Self(sign * cents))
            .ok_or_else(err)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Float(f64),
            Int(i64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(DeError::custom),
            Raw::Float(v) => {
                let cents = (v * 100.0).round();
                if cents.abs() > i64::MAX as f64 {
                    return Err(DeError::custom(MoneyConversionError(v.to_string())));
                }
                #[allow(clippy::cast_possible_truncation)]
                Ok(Self(cents as i64))
            },
            Raw::Int(v) => v.checked_mul(100).map(Self).ok_or_else(|| DeError::custom(MoneyConversionError(v.to_string()))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_two_decimals() {
        assert_eq!(Money::from_cents(1234).to_string(), "12.34");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
        assert_eq!(Money::from_whole(7).to_string(), "7.00");
    }

    #[test]
    fn parse_decimal_strings() {
        assert_eq!("12.34".parse::<Money>().unwrap(), Money::from_cents(1234));
        assert_eq!("12.3".parse::<Money>().unwrap(), Money::from_cents(1230));
        assert_eq!("12".parse::<Money>().unwrap(), Money::from_cents(1200));
        assert_eq!("-0.99".parse::<Money>().unwrap(), Money::from_cents(-99));
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
    }

    #[test]
    fn serde_round_trip() {
        let price = Money::from_cents(999);
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"9.99\"");
        assert_eq!(serde_json::from_str::<Money>("\"9.99\"").unwrap(), price);
        assert_eq!(serde_json::from_str::<Money>("9.99").unwrap(), price);
        assert_eq!(serde_json::from_str::<Money>("10").unwrap(), Money::from_whole(10));
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(500);
        let b = Money::from_cents(250);
        assert_eq!(a + b, Money::from_cents(750));
        assert_eq!(a - b, Money::from_cents(250));
        assert_eq!(b * 3, Money::from_cents(750));
        assert_eq!(-a, Money::from_cents(-500));
        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_cents(1000));
    }
}
