use std::fmt;

use super::record::{LogRecord, LogType, ResolvedMetadata};
use crate::common::numeric::finite_or_zero;
use crate::display::{DEFAULT_DIGITS, DisplayConfig, Quota};
use crate::pricing::{
    BASE_UNIT_PRICE, BillingMode, PriceQuery, PriceUnit, format_price_display,
};

/// Ratio 1 prices `BASE_UNIT_PRICE` per this many tokens.
const TOKENS_PER_BASE_UNIT: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceCategory {
    Input,
    Output,
    CachedWrite,
    CachedRead,
    Reasoning,
    Request,
}

impl PriceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::CachedWrite => "Cache write",
            Self::CachedRead => "Cache read",
            Self::Reasoning => "Reasoning",
            Self::Request => "Request",
        }
    }
}

/// Original and actual unit price of one token category.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLine {
    pub category: PriceCategory,
    /// Trimmed price at group ratio 1.
    pub original: String,
    /// Trimmed price at the recorded group ratio.
    pub actual: String,
    pub unit: PriceUnit,
    /// The group ratio lowered the price; the original is shown struck
    /// through.
    pub discounted: bool,
}

impl PriceLine {
    pub fn original_display(&self) -> String {
        format!("${}{}", format_price_display(&self.original), self.unit)
    }

    pub fn actual_display(&self) -> String {
        format!("${}{}", format_price_display(&self.actual), self.unit)
    }
}

impl fmt::Display for PriceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.discounted {
            write!(
                f,
                "{}: ~~{}~~ {}",
                self.category.label(),
                self.original_display(),
                self.actual_display()
            )
        } else {
            write!(f, "{}: {}", self.category.label(), self.actual_display())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub mode: BillingMode,
    pub group_ratio: f64,
    pub lines: Vec<PriceLine>,
    pub quota: Quota,
    pub original_quota: Quota,
    pub saved_percent: Option<i64>,
    /// Rendered `quota`.
    pub total: String,
}

/// What a usage-log row shows in its billing column.
#[derive(Debug, Clone, PartialEq)]
pub enum LogBilling {
    /// A consumption record that cost nothing.
    Free,
    /// No price detail recorded; only the charged quota is known.
    Plain { quota: Quota, display: String },
    Detailed(PriceBreakdown),
}

impl LogBilling {
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }

    pub fn saved_percent(&self) -> Option<i64> {
        match self {
            Self::Detailed(breakdown) => breakdown.saved_percent,
            _ => None,
        }
    }
}

impl fmt::Display for LogBilling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("Free"),
            Self::Plain { display, .. } => f.write_str(display),
            Self::Detailed(breakdown) => {
                for line in &breakdown.lines {
                    writeln!(f, "{line}")?;
                }
                write!(f, "Total: {}", breakdown.total)?;
                if let Some(percent) = breakdown.saved_percent {
                    write!(f, "\n{percent}% saved")?;
                }
                Ok(())
            }
        }
    }
}

/// Share of the original quota saved by the group discount, as a whole
/// percent. Only defined when both quotas are positive and the group ratio
/// is an actual discount.
pub fn saved_percent(quota: Quota, original_quota: Quota, group_ratio: f64) -> Option<i64> {
    if original_quota.get() > 0 && quota.get() > 0 && group_ratio < 1.0 {
        let ratio = quota.as_f64() / original_quota.as_f64();
        Some(((1.0 - ratio) * 100.0).round() as i64)
    } else {
        None
    }
}

/// Builds [`LogBilling`] values for usage-log rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakdownRenderer {
    display: DisplayConfig,
    base_unit_price: f64,
    digits: usize,
}

impl BreakdownRenderer {
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            display,
            base_unit_price: BASE_UNIT_PRICE,
            digits: DEFAULT_DIGITS,
        }
    }

    pub fn base_unit_price(mut self, price: f64) -> Self {
        self.base_unit_price = finite_or_zero(price);
        self
    }

    pub fn digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    pub fn render(&self, record: &LogRecord) -> LogBilling {
        let quota = record.quota_or_zero();
        let input_ratio = record.metadata.as_ref().and_then(|m| m.input_ratio);

        if quota.is_zero() && record.log_type == LogType::Consume && input_ratio.is_none() {
            return LogBilling::Free;
        }

        let (Some(meta), Some(input_ratio)) = (record.metadata.as_ref(), input_ratio) else {
            tracing::debug!(id = ?record.id, "Log record has no price detail");
            return LogBilling::Plain {
                quota,
                display: self.display.render_quota(quota, self.digits),
            };
        };

        let original_quota = meta
            .original_quota
            .unwrap_or_else(|| self.original_quota(record, meta, input_ratio));

        LogBilling::Detailed(PriceBreakdown {
            mode: meta.mode,
            group_ratio: meta.group_ratio,
            lines: self.price_lines(meta, input_ratio),
            quota,
            original_quota,
            saved_percent: saved_percent(quota, original_quota, meta.group_ratio),
            total: self.display.render_quota(quota, self.digits),
        })
    }

    fn price_lines(&self, meta: &ResolvedMetadata, input_ratio: f64) -> Vec<PriceLine> {
        let line = |category: PriceCategory, ratio: f64, multiplier: Option<f64>| {
            let mut query = PriceQuery::new(ratio, 1.0)
                .mode(meta.mode)
                .base_unit_price(self.base_unit_price);
            if let Some(multiplier) = multiplier {
                query = query.cache_multiplier(multiplier);
            }
            PriceLine {
                category,
                original: query.calculate(),
                actual: query.group_ratio(meta.group_ratio).calculate(),
                unit: meta.mode.unit(),
                discounted: meta.group_ratio < 1.0,
            }
        };

        let mut lines = if meta.mode.is_per_request() {
            vec![line(PriceCategory::Request, input_ratio, None)]
        } else {
            vec![
                line(PriceCategory::Input, input_ratio, None),
                line(PriceCategory::Output, meta.output_ratio, None),
            ]
        };
        if meta.cached_write_tokens > 0 {
            lines.push(line(
                PriceCategory::CachedWrite,
                input_ratio,
                Some(meta.cached_write_ratio),
            ));
        }
        if meta.cached_read_tokens > 0 {
            lines.push(line(
                PriceCategory::CachedRead,
                input_ratio,
                Some(meta.cached_read_ratio),
            ));
        }
        if meta.reasoning_tokens > 0 {
            lines.push(line(
                PriceCategory::Reasoning,
                meta.output_ratio,
                Some(meta.reasoning_ratio),
            ));
        }
        lines
    }

    /// Quota the record would have cost at group ratio 1.
    fn original_quota(
        &self,
        record: &LogRecord,
        meta: &ResolvedMetadata,
        input_ratio: f64,
    ) -> Quota {
        let amount = if meta.mode.is_per_request() {
            input_ratio * self.base_unit_price
        } else {
            let weighted = record.prompt_tokens as f64 * input_ratio
                + record.completion_tokens as f64 * meta.output_ratio
                + meta.cached_write_tokens as f64 * input_ratio * meta.cached_write_ratio
                + meta.cached_read_tokens as f64 * input_ratio * meta.cached_read_ratio
                + meta.reasoning_tokens as f64 * meta.output_ratio * meta.reasoning_ratio;
            weighted * self.base_unit_price / TOKENS_PER_BASE_UNIT
        };
        self.display.quota_from_amount(amount)
    }
}

impl Default for BreakdownRenderer {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::record::LogMetadata;

    fn renderer() -> BreakdownRenderer {
        BreakdownRenderer::new(DisplayConfig::currency())
    }

    #[test]
    fn test_free_consumption_record() {
        let record = LogRecord::new(LogType::Consume).with_quota(0);
        assert!(renderer().render(&record).is_free());

        let record = LogRecord::new(LogType::Consume);
        assert_eq!(renderer().render(&record), LogBilling::Free);
        assert_eq!(renderer().render(&record).to_string(), "Free");
    }

    #[test]
    fn test_zero_quota_with_ratio_is_not_free() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(0)
            .with_metadata(LogMetadata {
                input_ratio: Some(1.0),
                ..Default::default()
            });
        assert!(matches!(renderer().render(&record), LogBilling::Detailed(_)));
    }

    #[test]
    fn test_non_consumption_without_detail_is_plain() {
        let record = LogRecord::new(LogType::TopUp).with_quota(500_000);
        assert_eq!(
            renderer().render(&record),
            LogBilling::Plain {
                quota: Quota::new(500_000),
                display: "$1.00".to_string(),
            }
        );

        let record = LogRecord::new(LogType::System);
        assert!(matches!(
            renderer().render(&record),
            LogBilling::Plain { .. }
        ));
    }

    #[test]
    fn test_consumption_with_metadata_but_no_ratio_is_plain() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(1200)
            .with_metadata(LogMetadata {
                group_ratio: Some(0.5),
                ..Default::default()
            });
        assert_eq!(renderer().render(&record).to_string(), "$0.01");
    }

    #[test]
    fn test_discounted_token_breakdown() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(1000)
            .with_tokens(1000, 0)
            .with_metadata(LogMetadata {
                input_ratio: Some(2.0),
                group_ratio: Some(0.5),
                ..Default::default()
            });

        let LogBilling::Detailed(breakdown) = renderer().render(&record) else {
            panic!("expected detailed breakdown");
        };
        assert_eq!(breakdown.mode, BillingMode::Tokens);
        assert_eq!(breakdown.lines.len(), 2);

        let input = &breakdown.lines[0];
        assert_eq!(input.category, PriceCategory::Input);
        assert_eq!(input.original_display(), "$4.00/M");
        assert_eq!(input.actual_display(), "$2.00/M");
        assert!(input.discounted);
        assert_eq!(input.to_string(), "Input: ~~$4.00/M~~ $2.00/M");

        assert_eq!(breakdown.original_quota, Quota::new(2000));
        assert_eq!(breakdown.saved_percent, Some(50));
    }

    #[test]
    fn test_per_request_breakdown() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(500)
            .with_metadata(LogMetadata {
                input_ratio: Some(0.5),
                price_type: BillingMode::Times,
                reasoning_tokens: 100,
                ..Default::default()
            });

        let LogBilling::Detailed(breakdown) = renderer().render(&record) else {
            panic!("expected detailed breakdown");
        };
        assert_eq!(breakdown.lines.len(), 2);
        let line = &breakdown.lines[0];
        assert_eq!(line.category, PriceCategory::Request);
        assert_eq!(line.unit, PriceUnit::PerRequest);
        assert_eq!(line.actual, "0.001");
        assert!(!line.discounted);
        assert_eq!(line.to_string(), "Request: $0.001/Request");
        assert_eq!(breakdown.lines[1].category, PriceCategory::Reasoning);
        assert_eq!(breakdown.original_quota, Quota::new(500));
        assert_eq!(breakdown.saved_percent, None);
    }

    #[test]
    fn test_per_request_keeps_cache_lines() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(1000)
            .with_metadata(LogMetadata {
                input_ratio: Some(2.0),
                group_ratio: Some(0.5),
                price_type: BillingMode::Times,
                cached_write_tokens: 50,
                cached_read_tokens: 100,
                reasoning_tokens: 100,
                ..Default::default()
            });

        let LogBilling::Detailed(breakdown) = renderer().render(&record) else {
            panic!("expected detailed breakdown");
        };
        let categories: Vec<PriceCategory> = breakdown.lines.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![
                PriceCategory::Request,
                PriceCategory::CachedWrite,
                PriceCategory::CachedRead,
                PriceCategory::Reasoning,
            ]
        );
        assert!(breakdown.lines.iter().all(|l| l.unit == PriceUnit::PerRequest));
        // 2 * 0.002 * 0.1 at group 1, halved by the group ratio
        assert_eq!(breakdown.lines[2].original, "0.0004");
        assert_eq!(breakdown.lines[2].actual, "0.0002");
        assert_eq!(
            breakdown.lines[2].to_string(),
            "Cache read: ~~$0.0004/Request~~ $0.0002/Request"
        );
        assert_eq!(breakdown.lines[1].actual, "0.0025");
        assert_eq!(breakdown.lines[3].actual, "0.002");
    }

    #[test]
    fn test_cache_and_reasoning_lines() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(5000)
            .with_tokens(1000, 1000)
            .with_metadata(LogMetadata {
                input_ratio: Some(1.5),
                output_ratio: Some(6.0),
                cached_write_tokens: 400,
                cached_read_tokens: 2000,
                reasoning_tokens: 300,
                reasoning_ratio: Some(1.0),
                ..Default::default()
            });

        let LogBilling::Detailed(breakdown) = renderer().render(&record) else {
            panic!("expected detailed breakdown");
        };
        let categories: Vec<PriceCategory> = breakdown.lines.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![
                PriceCategory::Input,
                PriceCategory::Output,
                PriceCategory::CachedWrite,
                PriceCategory::CachedRead,
                PriceCategory::Reasoning,
            ]
        );
        assert_eq!(breakdown.lines[1].actual, "12");
        assert_eq!(breakdown.lines[2].actual, "3.75");
        assert_eq!(breakdown.lines[3].actual, "0.3");
        assert_eq!(breakdown.lines[4].actual, "12");
    }

    #[test]
    fn test_zero_token_categories_omitted() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(10)
            .with_metadata(LogMetadata {
                input_ratio: Some(1.0),
                cached_read_ratio: Some(0.25),
                ..Default::default()
            });
        let LogBilling::Detailed(breakdown) = renderer().render(&record) else {
            panic!("expected detailed breakdown");
        };
        assert_eq!(breakdown.lines.len(), 2);
    }

    #[test]
    fn test_recorded_original_quota_wins() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(750)
            .with_tokens(10, 10)
            .with_metadata(LogMetadata {
                input_ratio: Some(1.0),
                group_ratio: Some(0.75),
                original_quota: Some(1000),
                ..Default::default()
            });
        assert_eq!(renderer().render(&record).saved_percent(), Some(25));
    }

    #[test]
    fn test_saved_percent_conditions() {
        assert_eq!(saved_percent(Quota::new(500), Quota::new(1000), 0.5), Some(50));
        assert_eq!(saved_percent(Quota::new(500), Quota::new(1000), 1.0), None);
        assert_eq!(saved_percent(Quota::ZERO, Quota::new(1000), 0.5), None);
        assert_eq!(saved_percent(Quota::new(500), Quota::ZERO, 0.5), None);
        assert_eq!(saved_percent(Quota::new(2), Quota::new(3), 0.7), Some(33));
    }

    #[test]
    fn test_display_detailed() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(1000)
            .with_tokens(1000, 0)
            .with_metadata(LogMetadata {
                input_ratio: Some(2.0),
                group_ratio: Some(0.5),
                ..Default::default()
            });
        let text = renderer().render(&record).to_string();
        assert_eq!(
            text,
            "Input: ~~$4.00/M~~ $2.00/M\nOutput: ~~$4.00/M~~ $2.00/M\nTotal: $0.01\n50% saved"
        );
    }

    #[test]
    fn test_raw_number_total() {
        let record = LogRecord::new(LogType::Consume)
            .with_quota(25_000)
            .with_tokens(25_000, 0)
            .with_metadata(LogMetadata {
                input_ratio: Some(1.0),
                ..Default::default()
            });
        let renderer = BreakdownRenderer::new(DisplayConfig::raw_number());
        let LogBilling::Detailed(breakdown) = renderer.render(&record) else {
            panic!("expected detailed breakdown");
        };
        assert_eq!(breakdown.total, "25.0k");
        assert_eq!(breakdown.saved_percent, None);
    }
}
