use std::fmt;

use serde::{Deserialize, Serialize};

/// How a model is billed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMode {
    /// Priced per million tokens.
    #[default]
    Tokens,
    /// Priced per request.
    Times,
}

impl BillingMode {
    /// Resolves the `price_type` field of log metadata. Anything other than
    /// `"times"` is token pricing.
    pub fn from_price_type(price_type: Option<&str>) -> Self {
        match price_type.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("times") => Self::Times,
            _ => Self::Tokens,
        }
    }

    pub fn is_per_request(&self) -> bool {
        matches!(self, Self::Times)
    }

    pub fn unit(&self) -> PriceUnit {
        match self {
            Self::Tokens => PriceUnit::PerMillionTokens,
            Self::Times => PriceUnit::PerRequest,
        }
    }
}

/// Unit suffix appended after a displayed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceUnit {
    PerMillionTokens,
    PerRequest,
}

impl PriceUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::PerMillionTokens => "/M",
            Self::PerRequest => "/Request",
        }
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
