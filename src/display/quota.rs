use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::numeric::{finite_or_zero, parse_number};

/// The platform's smallest billing unit.
///
/// Stored quota is never negative, but refunds and debits are displayed
/// with a negated value, so the newtype is signed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quota(i64);

impl Quota {
    pub const ZERO: Quota = Quota(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Converts a loosely typed number, rounding to the nearest unit.
    /// `NaN` and infinities become zero.
    pub fn from_f64(value: f64) -> Self {
        Self(finite_or_zero(value).round() as i64)
    }

    /// Parses a persisted or user-supplied quota; non-numeric text is zero.
    pub fn parse(raw: &str) -> Self {
        Self::from_f64(parse_number(raw))
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }
}

impl From<i64> for Quota {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Quota {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

impl From<u32> for Quota {
    fn from(value: u32) -> Self {
        Self(value.into())
    }
}

impl From<Quota> for i64 {
    fn from(quota: Quota) -> Self {
        quota.0
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
