//! Top-up discounts and charge quoting.

mod charge;
mod discount;

pub use charge::{BASE_CURRENCY, ChargeQuote, PaymentMethod};
pub use discount::{DiscountTable, resolve_discount};

use std::str::FromStr;

use rust_decimal::Decimal;

/// Reads a user-entered top-up amount; anything unparseable is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or_else(|_| {
        tracing::debug!(raw, "non-numeric top-up amount coerced to zero");
        Decimal::ZERO
    })
}
