//! Minor-unit money arithmetic
//!
//! All amounts are carried as integer minor units (cents) in commit
//! paths; serde converts to and from `rust_decimal` so amounts cross
//! every boundary as exact two-digit decimals. No floating point ever
//! touches a total.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use thiserror::Error;

/// Two fractional digits on the wire
const SCALE: u32 = 2;

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("amount has more than two fractional digits: {0}")]
    TooPrecise(Decimal),

    #[error("amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("amount out of range: {0}")]
    OutOfRange(Decimal),

    #[error("money arithmetic overflow")]
    Overflow,
}

/// An amount of money in integer minor units
///
/// In memory this is a plain `i64` of minor units; on the wire (and in
/// the store) it reads and writes as a decimal, so `2500` minor units
/// serialize as `"25.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Wrap a raw minor-unit amount
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Raw minor-unit amount
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Convert a boundary decimal (max two fractional digits, non-negative)
    pub fn from_decimal(d: Decimal) -> Result<Self, MoneyError> {
        if d.is_sign_negative() && !d.is_zero() {
            return Err(MoneyError::Negative(d));
        }
        let scaled = d * Decimal::from(100);
        if scaled.normalize().scale() > 0 {
            return Err(MoneyError::TooPrecise(d));
        }
        scaled
            .to_i64()
            .map(Money)
            .ok_or(MoneyError::OutOfRange(d))
    }

    /// Boundary representation with two fractional digits
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Checked addition
    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked multiplication by a quantity
    pub fn checked_mul(self, qty: i64) -> Result<Money, MoneyError> {
        self.0
            .checked_mul(qty)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        <Decimal as Serialize>::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decimal = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(decimal).map_err(serde::de::Error::custom)
    }
}

impl Sum<Money> for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| {
            Money(acc.0.saturating_add(m.0))
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
