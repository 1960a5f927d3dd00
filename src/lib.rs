//! # quota-display
//!
//! Billing display arithmetic for API reselling consoles.
//!
//! The backend bills in integer quota. This crate turns quota, price ratios
//! and top-up amounts into the strings a console shows: `$1.25` or `12.3k`
//! balances, `$2.00/M` unit prices, discounted top-up charges, and the
//! per-request price breakdown of a usage log.
//!
//! ## Quick Start
//!
//! ```rust
//! use quota_display::{DisplayConfig, BillingMode, calculate_price};
//!
//! let display = DisplayConfig::currency();
//! assert_eq!(display.render_quota(625_000, 2), "$1.25");
//! assert_eq!(calculate_price(1.0, 0.5, BillingMode::Tokens), "1");
//! ```
//!
//! ## Usage Logs
//!
//! ```rust
//! use quota_display::{BreakdownRenderer, DisplayConfig, LogRecord};
//!
//! let record: LogRecord = serde_json::from_str(
//!     r#"{"type": 2, "quota": 1000, "prompt_tokens": 1000,
//!         "other": "{\"model_ratio\": 2, \"group_ratio\": 0.5}"}"#,
//! )?;
//! let billing = BreakdownRenderer::new(DisplayConfig::currency()).render(&record);
//! assert_eq!(billing.saved_percent(), Some(50));
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## Settings
//!
//! ```rust,no_run
//! use quota_display::config::StoreBuilder;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), quota_display::Error> {
//!     let store = StoreBuilder::new().env_with_prefix("CONSOLE_").build();
//!     let settings = quota_display::load_settings(store).await?;
//!     println!("{}", settings.display.render_quota(1_000_000, 2));
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod display;
pub mod logs;
pub mod prelude;
pub mod pricing;
pub mod topup;

// Re-exports for convenience
pub use config::{
    BillingSettings, ConfigError, EnvStore, FileStore, LayeredStore, MemoryStore, SettingsLoader,
    SettingsStore, SettingsStoreExt, StoreBuilder,
};
pub use display::{DEFAULT_QUOTA_PER_UNIT, DisplayConfig, DisplayMode, Quota, render_number};
pub use logs::{
    BreakdownRenderer, LogBilling, LogMetadata, LogRecord, LogType, PriceBreakdown, PriceCategory,
    PriceLine,
};
pub use pricing::{
    BASE_UNIT_PRICE, BillingMode, PriceQuery, PriceUnit, calculate_price, format_price_display,
    trim_trailing_zeros,
};
pub use topup::{ChargeQuote, DiscountTable, PaymentMethod, parse_amount, resolve_discount};

/// Error type for quota-display operations.
///
/// Formatting never fails; errors come from reading or writing settings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or invalid.
    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    /// Write attempted on a read-only settings store.
    #[error("Settings store '{store}' is read-only")]
    ReadOnly { store: String },
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing, malformed or unwritable settings
    Configuration,
    /// IO and JSON failures
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Env(_) | Error::ReadOnly { .. } => {
                ErrorCategory::Configuration
            }
            Error::Io(_) | Error::Json(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound { key } => Error::Config(format!("Key not found: {key}")),
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {key}: {message}"))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Env(e) => Error::Env(e),
            config::ConfigError::ReadOnly { store } => Error::ReadOnly { store },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Loads billing settings from `store` in one call.
pub async fn load_settings(store: impl SettingsStore + 'static) -> Result<BillingSettings> {
    Ok(SettingsLoader::new(store).load().await?)
}
