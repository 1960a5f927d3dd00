use super::format::{format_price_display, trim_trailing_zeros};
use super::mode::BillingMode;
use crate::common::numeric::{finite_or_zero, to_fixed};

/// Price of ratio 1 per thousand tokens (token mode) or per request.
pub const BASE_UNIT_PRICE: f64 = 0.002;

/// Per-thousand to per-million normalization in token mode.
const PER_MILLION_FACTOR: f64 = 1000.0;

/// Fraction digits computed before trimming.
const PRICE_DIGITS: usize = 6;

/// Inputs of a displayed unit price.
///
/// ```
/// use quota_display::pricing::{BillingMode, PriceQuery};
///
/// let price = PriceQuery::new(1.0, 0.5).mode(BillingMode::Tokens).calculate();
/// assert_eq!(price, "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuery {
    ratio: f64,
    group_ratio: f64,
    mode: BillingMode,
    base_unit_price: f64,
    cache_multiplier: Option<f64>,
}

impl PriceQuery {
    pub fn new(ratio: f64, group_ratio: f64) -> Self {
        Self {
            ratio,
            group_ratio,
            mode: BillingMode::Tokens,
            base_unit_price: BASE_UNIT_PRICE,
            cache_multiplier: None,
        }
    }

    pub fn group_ratio(mut self, group_ratio: f64) -> Self {
        self.group_ratio = group_ratio;
        self
    }

    pub fn mode(mut self, mode: BillingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn per_request(self) -> Self {
        self.mode(BillingMode::Times)
    }

    pub fn base_unit_price(mut self, price: f64) -> Self {
        self.base_unit_price = price;
        self
    }

    /// Multiplier of a cache or reasoning token category.
    pub fn cache_multiplier(mut self, multiplier: f64) -> Self {
        self.cache_multiplier = Some(multiplier);
        self
    }

    pub fn billing_mode(&self) -> BillingMode {
        self.mode
    }

    /// Unrounded price in currency per unit.
    pub fn value(&self) -> f64 {
        let mut discount = finite_or_zero(self.ratio) * finite_or_zero(self.group_ratio);
        if !self.mode.is_per_request() {
            discount *= PER_MILLION_FACTOR;
        }

        let mut price = discount * finite_or_zero(self.base_unit_price);
        if let Some(multiplier) = self.cache_multiplier {
            price *= finite_or_zero(multiplier);
        }
        finite_or_zero(price)
    }

    /// Price rounded to six digits with trailing zeros removed.
    pub fn calculate(&self) -> String {
        trim_trailing_zeros(&to_fixed(self.value(), PRICE_DIGITS))
    }

    /// Badge text such as `$2.00/M` or `$0.004/Request`.
    pub fn display(&self) -> String {
        format!(
            "${}{}",
            format_price_display(&self.calculate()),
            self.mode.unit()
        )
    }
}

/// Displayed unit price for `ratio` under `group_ratio`, using the default
/// base unit price and no cache multiplier.
pub fn calculate_price(ratio: f64, group_ratio: f64, mode: BillingMode) -> String {
    PriceQuery::new(ratio, group_ratio).mode(mode).calculate()
}
