//! Prelude module for convenient imports.
//!
//! ```rust
//! use quota_display::prelude::*;
//!
//! assert_eq!(DisplayConfig::raw_number().render_quota(12_345, 2), "12.3k");
//! ```

pub use crate::Error;
pub use crate::Result;

// Display
pub use crate::display::{DisplayConfig, DisplayMode, Quota};

// Pricing
pub use crate::pricing::{BillingMode, PriceQuery, calculate_price};

// Top-up
pub use crate::topup::{ChargeQuote, DiscountTable, PaymentMethod};

// Logs
pub use crate::logs::{BreakdownRenderer, LogBilling, LogRecord};

// Settings
pub use crate::config::{BillingSettings, SettingsLoader, SettingsStore, SettingsStoreExt};
