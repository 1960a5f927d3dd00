//! Billing Display Tests
//!
//! End-to-end scenarios over the public API: settings loading, balance
//! rendering, unit prices, top-up quotes and usage-log breakdowns.
//!
//! Run: cargo nextest run --test billing_display_tests

use quota_display::prelude::*;
use rust_decimal_macros::dec;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Quota display
// =============================================================================

mod quota_tests {
    use super::*;

    #[test]
    fn test_currency_rendering() {
        let display = DisplayConfig::currency();
        assert_eq!(display.render_quota(500_000, 2), "$1.00");
        assert_eq!(display.render_quota(-250_000, 2), "-$0.50");
        assert_eq!(display.render_quota(Quota::parse("abc"), 2), "$0.00");
    }

    #[test]
    fn test_raw_rendering() {
        let display = DisplayConfig::raw_number();
        assert_eq!(display.render_quota(9_999, 2), "9999");
        assert_eq!(display.render_quota(12_345, 2), "12.3k");
        assert_eq!(display.render_quota(1_250_000, 2), "1.3M");
        assert_eq!(display.render_quota(3_000_000_000i64, 2), "3.0B");
    }

    #[test]
    fn test_persisted_mode() {
        assert_eq!(DisplayMode::from_persisted(None), DisplayMode::Currency);
        assert_eq!(DisplayMode::from_persisted(Some("true")), DisplayMode::Currency);
        assert_eq!(DisplayMode::from_persisted(Some("false")), DisplayMode::RawNumber);
    }
}

// =============================================================================
// Unit prices
// =============================================================================

mod pricing_tests {
    use super::*;
    use quota_display::format_price_display;

    #[test]
    fn test_group_discount_halves_price() {
        assert_eq!(calculate_price(1.0, 1.0, BillingMode::Tokens), "2");
        assert_eq!(calculate_price(1.0, 0.5, BillingMode::Tokens), "1");
        assert_eq!(calculate_price(0.0, 0.5, BillingMode::Times), "0");
    }

    #[test]
    fn test_price_badges() {
        assert_eq!(PriceQuery::new(2.0, 0.5).display(), "$2.00/M");
        assert_eq!(
            PriceQuery::new(0.5, 1.0).per_request().display(),
            "$0.001/Request"
        );
        assert_eq!(format_price_display("1.5"), "1.50");
    }
}

// =============================================================================
// Top-up
// =============================================================================

mod topup_tests {
    use super::*;
    use quota_display::{parse_amount, resolve_discount};

    #[test]
    fn test_discount_lookup() {
        let table = DiscountTable::from_json(r#"{"100": 0.9, "500": "0.8"}"#).unwrap();
        assert_eq!(resolve_discount(dec!(100), &table), dec!(0.9));
        assert_eq!(resolve_discount(dec!(100.00), &table), dec!(0.9));
        assert_eq!(resolve_discount(dec!(50), &table), dec!(1));
        assert_eq!(resolve_discount(parse_amount("500"), &table), dec!(0.8));
    }

    #[test]
    fn test_charge_quote() {
        let table = DiscountTable::new().discount(dec!(100), dec!(0.9));
        let method = PaymentMethod::new("card").fee_rate(dec!(0.03));
        let quote = method.quote(dec!(100), &table, dec!(1));
        assert_eq!(quote.total, dec!(92.7));
        assert_eq!(quote.savings(), dec!(10));
    }
}

// =============================================================================
// Usage logs
// =============================================================================

mod log_tests {
    use super::*;
    use quota_display::{LogType, PriceCategory};

    fn record(value: serde_json::Value) -> LogRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_free_badge() {
        init_tracing();
        let billing = BreakdownRenderer::default().render(&record(json!({"type": 2, "quota": 0})));
        assert!(billing.is_free());
        assert_eq!(billing.to_string(), "Free");
    }

    #[test]
    fn test_plain_quota_for_top_up_log() {
        let log = record(json!({"type": 1, "quota": 5_000_000}));
        assert_eq!(log.log_type, LogType::TopUp);

        let billing = BreakdownRenderer::new(DisplayConfig::currency()).render(&log);
        assert_eq!(billing.to_string(), "$10.00");

        let billing = BreakdownRenderer::new(DisplayConfig::raw_number()).render(&log);
        assert_eq!(billing.to_string(), "5.0M");
    }

    #[test]
    fn test_discounted_breakdown_from_encoded_metadata() {
        init_tracing();
        let log = record(json!({
            "id": 42,
            "type": 2,
            "quota": 1000,
            "prompt_tokens": 1000,
            "completion_tokens": 0,
            "model_name": "gpt-4o-mini",
            "other": "{\"model_ratio\": 2, \"group_ratio\": 0.5}"
        }));

        let LogBilling::Detailed(breakdown) = BreakdownRenderer::default().render(&log) else {
            panic!("expected detailed breakdown");
        };
        let input = &breakdown.lines[0];
        assert_eq!(input.category, PriceCategory::Input);
        assert_eq!(input.original_display(), "$4.00/M");
        assert_eq!(input.actual_display(), "$2.00/M");
        assert_eq!(breakdown.saved_percent, Some(50));
    }

    #[test]
    fn test_cache_lines_from_metadata_object() {
        let log = record(json!({
            "type": 2,
            "quota": "4000",
            "prompt_tokens": 1000,
            "completion_tokens": 500,
            "metadata": {
                "input_ratio": "1.5",
                "output_ratio": 6,
                "cache_tokens": 800,
                "cache_creation_tokens": 200
            }
        }));

        let LogBilling::Detailed(breakdown) = BreakdownRenderer::default().render(&log) else {
            panic!("expected detailed breakdown");
        };
        let labels: Vec<&str> = breakdown.lines.iter().map(|l| l.category.label()).collect();
        assert_eq!(labels, vec!["Input", "Output", "Cache write", "Cache read"]);
        assert_eq!(breakdown.lines[3].actual_display(), "$0.30/M");
        assert_eq!(breakdown.saved_percent, None);
    }
}

// =============================================================================
// Settings
// =============================================================================

mod settings_tests {
    use super::*;
    use quota_display::{FileStore, LogType, MemoryStore, StoreBuilder, load_settings};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_settings_drive_rendering() {
        init_tracing();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let settings = json!({
            "display_in_currency": false,
            "quota_per_unit": 500000,
            "topup_discount": {"10": 0.95},
            "usd_exchange_rate": "7.31"
        });
        tokio::fs::write(&path, settings.to_string()).await.unwrap();

        let settings = load_settings(FileStore::new(&path)).await.unwrap();
        assert_eq!(settings.display.mode, DisplayMode::RawNumber);
        assert_eq!(settings.display.render_quota(12_345, 2), "12.3k");

        let quote = settings.quote(&PaymentMethod::new("alipay").currency("CNY"), dec!(10));
        assert_eq!(quote.total, dec!(69.45));
    }

    #[tokio::test]
    async fn test_layered_settings_and_breakdown() {
        let store = StoreBuilder::new()
            .memory(MemoryStore::named("admin").value("quota_per_unit", "1000"))
            .memory(MemoryStore::named("defaults").value("display_in_currency", "true"))
            .build();
        let settings = SettingsLoader::new(store).load().await.unwrap();

        let log = LogRecord::new(LogType::System).with_quota(2500);
        assert_eq!(settings.breakdown_renderer().render(&log).to_string(), "$2.50");
    }

    #[tokio::test]
    async fn test_read_only_store_write_is_error() {
        let loader = SettingsLoader::new(quota_display::EnvStore::prefixed("QUOTA_DISPLAY_IT_"));
        let err: Error = loader
            .save_display(&DisplayConfig::currency())
            .await
            .unwrap_err()
            .into();
        assert!(err.is_configuration_error());
    }
}
