//! Coerce-to-zero numeric policy.
//!
//! Every value that reaches a formatter passes through here first, so the
//! formatters themselves never see `NaN`, infinities or non-numeric text.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, de::IgnoredAny};

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: usize = 28;

/// Returns `value` when finite, otherwise `0.0`.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::debug!(value = %value, "non-finite number coerced to zero");
        0.0
    }
}

/// Parses a persisted or user-supplied number, coercing anything
/// unparseable to `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) => finite_or_zero(value),
        Err(_) => {
            tracing::debug!(raw, "non-numeric input coerced to zero");
            0.0
        }
    }
}

/// Formats `value` with exactly `digits` fraction digits.
///
/// Ties round away from zero on the exact binary value (`0.125` with two
/// digits gives `"0.13"`), which is what browser consoles display.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let value = finite_or_zero(value);
    if digits <= MAX_DECIMAL_SCALE
        && let Some(exact) = Decimal::from_f64_retain(value)
    {
        let rounded =
            exact.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointAwayFromZero);
        return format!("{:.*}", digits, rounded);
    }
    format!("{:.*}", digits, value)
}

/// Backends are not consistent about numeric fields: the same field may be
/// a JSON integer, a float, a numeric string or garbage.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Lenient {
    fn into_f64(self) -> Option<f64> {
        match self {
            Lenient::Int(v) => Some(v as f64),
            Lenient::Float(v) => Some(finite_or_zero(v)),
            Lenient::Text(s) if s.trim().is_empty() => None,
            Lenient::Text(s) => Some(parse_number(&s)),
            Lenient::Other(_) => None,
        }
    }

    fn into_i64(self) -> Option<i64> {
        match self {
            Lenient::Int(v) => Some(v),
            other => other.into_f64().map(|v| v.round() as i64),
        }
    }
}

/// `null`, missing and non-scalar values become `None`; non-numeric text
/// becomes `Some(0.0)`.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient>::deserialize(deserializer)?.and_then(Lenient::into_f64))
}

pub(crate) fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient>::deserialize(deserializer)?.and_then(Lenient::into_i64))
}

/// Token counts: negative or missing counts read as zero.
pub(crate) fn deserialize_token_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_i64(deserializer)?
        .map(|v| v.max(0) as u64)
        .unwrap_or(0))
}
