//! Quota display formatting.
//!
//! Quota is the integer unit the backend bills in. Consoles show it either
//! as a currency amount (`quota / quota_per_unit`, `$`-prefixed) or as a
//! compact magnitude (`12.3k`), depending on the persisted
//! `display_in_currency` preference. Both inputs live in [`DisplayConfig`]
//! so every formatter is a pure function of its arguments.

mod number;
mod quota;
mod render;

pub use number::render_number;
pub use quota::Quota;

use serde::{Deserialize, Serialize};

/// Quota units per one currency unit unless configured otherwise.
pub const DEFAULT_QUOTA_PER_UNIT: f64 = 500_000.0;

/// Fraction digits used for currency display.
pub const DEFAULT_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Currency,
    RawNumber,
}

impl DisplayMode {
    /// Interprets the persisted `display_in_currency` value. Only the exact
    /// string `"true"` enables currency; an absent value keeps the default.
    pub fn from_persisted(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some("true") => Self::Currency,
            Some(_) => Self::RawNumber,
        }
    }

    pub fn is_currency(&self) -> bool {
        matches!(self, Self::Currency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    quota_per_unit: f64,
}

impl DisplayConfig {
    pub fn new(mode: DisplayMode, quota_per_unit: f64) -> Self {
        Self {
            mode,
            quota_per_unit: sanitize_quota_per_unit(quota_per_unit),
        }
    }

    pub fn currency() -> Self {
        Self::new(DisplayMode::Currency, DEFAULT_QUOTA_PER_UNIT)
    }

    pub fn raw_number() -> Self {
        Self::new(DisplayMode::RawNumber, DEFAULT_QUOTA_PER_UNIT)
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_quota_per_unit(mut self, quota_per_unit: f64) -> Self {
        self.quota_per_unit = sanitize_quota_per_unit(quota_per_unit);
        self
    }

    pub fn quota_per_unit(&self) -> f64 {
        self.quota_per_unit
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::currency()
    }
}

/// The divisor must be usable: anything non-finite or not positive falls
/// back to the default instead of producing `NaN` or infinite amounts.
fn sanitize_quota_per_unit(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(
            quota_per_unit = %value,
            fallback = DEFAULT_QUOTA_PER_UNIT,
            "Unusable quota_per_unit, using default"
        );
        DEFAULT_QUOTA_PER_UNIT
    }
}
