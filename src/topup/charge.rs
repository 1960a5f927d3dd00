use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::discount::DiscountTable;

/// Currency account balances and top-up amounts are denominated in.
pub const BASE_CURRENCY: &str = "USD";

/// Fraction digits of a converted charge.
const CHARGE_DIGITS: u32 = 2;

/// A payment channel offered on the top-up page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Flat fee that replaces the proportional fee. Never discounted.
    #[serde(default)]
    pub fixed_fee: Option<Decimal>,
    /// Proportional fee charged on the discounted amount.
    #[serde(default)]
    pub fee_rate: Option<Decimal>,
}

fn default_currency() -> String {
    BASE_CURRENCY.to_string()
}

impl PaymentMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: default_currency(),
            fixed_fee: None,
            fee_rate: None,
        }
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn fixed_fee(mut self, fee: Decimal) -> Self {
        self.fixed_fee = Some(fee);
        self
    }

    pub fn fee_rate(mut self, rate: Decimal) -> Self {
        self.fee_rate = Some(rate);
        self
    }

    /// Whether charges through this method need currency conversion.
    pub fn is_foreign(&self) -> bool {
        !self.currency.eq_ignore_ascii_case(BASE_CURRENCY)
    }

    /// Fee on an already discounted amount.
    pub fn fee_for(&self, discounted: Decimal) -> Decimal {
        match (self.fixed_fee, self.fee_rate) {
            (Some(fixed), _) => fixed,
            (None, Some(rate)) => saturate(discounted.checked_mul(rate), "fee"),
            (None, None) => Decimal::ZERO,
        }
    }

    /// Computes what the user pays for topping up `amount`.
    ///
    /// `exchange_rate` converts base currency into this method's currency
    /// and is only applied to foreign methods; a non-positive rate is
    /// ignored.
    pub fn quote(
        &self,
        amount: Decimal,
        discounts: &DiscountTable,
        exchange_rate: Decimal,
    ) -> ChargeQuote {
        let amount = amount.max(Decimal::ZERO);
        let discount = discounts.resolve(amount);
        let discounted = saturate(amount.checked_mul(discount), "discounted amount");
        let fee = self.fee_for(discounted);
        let mut total = saturate(discounted.checked_add(fee), "total");

        if self.is_foreign() {
            let rate = if exchange_rate > Decimal::ZERO {
                exchange_rate
            } else {
                tracing::warn!(
                    method = %self.name,
                    %exchange_rate,
                    "Non-positive exchange rate, charging unconverted amount"
                );
                Decimal::ONE
            };
            total = saturate(total.checked_mul(rate), "converted total")
                .round_dp_with_strategy(CHARGE_DIGITS, RoundingStrategy::MidpointAwayFromZero);
        }

        tracing::debug!(
            method = %self.name,
            %amount,
            %discount,
            %fee,
            %total,
            "Quoted top-up charge"
        );

        ChargeQuote {
            amount,
            discount,
            discounted,
            fee,
            total,
            currency: self.currency.clone(),
        }
    }
}

/// Amounts beyond what `Decimal` holds clamp to its maximum.
fn saturate(value: Option<Decimal>, what: &str) -> Decimal {
    value.unwrap_or_else(|| {
        tracing::warn!(what, "Top-up charge overflowed, clamping to maximum");
        Decimal::MAX
    })
}

/// Breakdown of a top-up charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeQuote {
    /// Face amount credited to the account.
    pub amount: Decimal,
    pub discount: Decimal,
    pub discounted: Decimal,
    pub fee: Decimal,
    /// Amount charged, in `currency`.
    pub total: Decimal,
    pub currency: String,
}

impl ChargeQuote {
    /// Amount saved by the discount, in base currency.
    pub fn savings(&self) -> Decimal {
        self.amount - self.discounted
    }

    pub fn is_discounted(&self) -> bool {
        self.discount < Decimal::ONE
    }
}
