//! Displayed unit prices.
//!
//! A model's price is expressed as a ratio against [`BASE_UNIT_PRICE`].
//! Token-billed models are shown per million tokens, request-billed models
//! per request. The user's group ratio scales the result.

mod calculator;
mod format;
mod mode;

pub use calculator::{BASE_UNIT_PRICE, PriceQuery, calculate_price};
pub use format::{format_price_display, trim_trailing_zeros};
pub use mode::{BillingMode, PriceUnit};

/// Cached-read tokens cost a tenth of regular input tokens unless the
/// record says otherwise.
pub const CACHE_READ_DISCOUNT: f64 = 0.1;

/// Cache writes carry a premium over regular input tokens.
pub const CACHE_WRITE_PREMIUM: f64 = 1.25;
