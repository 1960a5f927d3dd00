//! Billing display settings loaded from a [`SettingsStore`].
//!
//! Keys read:
//! - `display_in_currency`: `"true"` shows currency, anything else raw
//!   quota; absent means currency.
//! - `quota_per_unit`: quota per currency unit, default 500000.
//! - `topup_discount`: JSON object of top-up amount to multiplier.
//! - `usd_exchange_rate`: base currency to payment currency, default 1.
//!
//! Malformed values fall back to their defaults with a warning; only store
//! failures are errors.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::ConfigResult;
use super::store::{SettingsStore, SettingsStoreExt};
use crate::common::numeric::parse_number;
use crate::display::{DEFAULT_QUOTA_PER_UNIT, DisplayConfig, DisplayMode};
use crate::logs::BreakdownRenderer;
use crate::topup::{ChargeQuote, DiscountTable, PaymentMethod};

pub const DISPLAY_IN_CURRENCY: &str = "display_in_currency";
pub const QUOTA_PER_UNIT: &str = "quota_per_unit";
pub const TOPUP_DISCOUNT: &str = "topup_discount";
pub const USD_EXCHANGE_RATE: &str = "usd_exchange_rate";

#[derive(Debug, Clone, PartialEq)]
pub struct BillingSettings {
    pub display: DisplayConfig,
    pub discounts: DiscountTable,
    pub exchange_rate: Decimal,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            discounts: DiscountTable::default(),
            exchange_rate: Decimal::ONE,
        }
    }
}

impl BillingSettings {
    pub fn breakdown_renderer(&self) -> BreakdownRenderer {
        BreakdownRenderer::new(self.display)
    }

    /// Quotes a top-up through `method` with the configured discounts and
    /// exchange rate.
    pub fn quote(&self, method: &PaymentMethod, amount: Decimal) -> ChargeQuote {
        method.quote(amount, &self.discounts, self.exchange_rate)
    }
}

/// Reads and writes [`BillingSettings`] through a store.
pub struct SettingsLoader {
    store: Box<dyn SettingsStore>,
}

impl SettingsLoader {
    pub fn new(store: impl SettingsStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    pub async fn load(&self) -> ConfigResult<BillingSettings> {
        let settings = BillingSettings {
            display: self.load_display().await?,
            discounts: self.load_discounts().await?,
            exchange_rate: self.load_exchange_rate().await?,
        };
        tracing::debug!(
            store = self.store.name(),
            mode = ?settings.display.mode,
            quota_per_unit = settings.display.quota_per_unit(),
            discounts = settings.discounts.len(),
            exchange_rate = %settings.exchange_rate,
            "Loaded billing settings"
        );
        Ok(settings)
    }

    pub async fn load_display(&self) -> ConfigResult<DisplayConfig> {
        let mode = DisplayMode::from_persisted(
            self.store.get_raw(DISPLAY_IN_CURRENCY).await?.as_deref(),
        );

        let quota_per_unit = match self.store.get_raw(QUOTA_PER_UNIT).await? {
            Some(raw) => {
                let parsed = parse_number(&raw);
                if parsed > 0.0 {
                    parsed
                } else {
                    tracing::warn!(value = %raw, "Invalid quota_per_unit, using default");
                    DEFAULT_QUOTA_PER_UNIT
                }
            }
            None => DEFAULT_QUOTA_PER_UNIT,
        };

        Ok(DisplayConfig::new(mode, quota_per_unit))
    }

    pub async fn load_discounts(&self) -> ConfigResult<DiscountTable> {
        let Some(raw) = self.store.get_raw(TOPUP_DISCOUNT).await? else {
            return Ok(DiscountTable::new());
        };
        Ok(DiscountTable::from_json(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Undecodable topup_discount, ignoring discounts");
            DiscountTable::new()
        }))
    }

    pub async fn load_exchange_rate(&self) -> ConfigResult<Decimal> {
        let Some(raw) = self.store.get_raw(USD_EXCHANGE_RATE).await? else {
            return Ok(Decimal::ONE);
        };
        match Decimal::from_str(raw.trim()) {
            Ok(rate) if rate > Decimal::ZERO => Ok(rate),
            _ => {
                tracing::warn!(value = %raw, "Invalid usd_exchange_rate, using 1");
                Ok(Decimal::ONE)
            }
        }
    }

    /// Persists the display preference in the form it is read back.
    pub async fn save_display(&self, display: &DisplayConfig) -> ConfigResult<()> {
        let store = self.store.as_ref();
        store
            .set(DISPLAY_IN_CURRENCY, &display.mode.is_currency())
            .await?;
        store.set(QUOTA_PER_UNIT, &display.quota_per_unit()).await
    }

    pub async fn save_discounts(&self, discounts: &DiscountTable) -> ConfigResult<()> {
        let object: serde_json::Map<String, serde_json::Value> = discounts
            .iter()
            .map(|(amount, multiplier)| {
                (
                    amount.to_string(),
                    serde_json::Value::String(multiplier.to_string()),
                )
            })
            .collect();
        let raw = serde_json::to_string(&object)?;
        self.store.set_raw(TOPUP_DISCOUNT, &raw).await
    }
}

impl std::fmt::Debug for SettingsLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsLoader")
            .field("store", &self.store.name())
            .finish()
    }
}
