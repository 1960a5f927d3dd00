//! Usage-log records and their billing column.
//!
//! A [`LogRecord`] is read leniently from the backend's JSON and turned into
//! a [`LogBilling`] by a [`BreakdownRenderer`]: a "Free" badge, the plain
//! charged quota, or a per-category price breakdown with the group discount
//! applied.

mod breakdown;
mod record;

pub use breakdown::{
    BreakdownRenderer, LogBilling, PriceBreakdown, PriceCategory, PriceLine, saved_percent,
};
pub use record::{LogMetadata, LogRecord, LogType, ResolvedMetadata};
