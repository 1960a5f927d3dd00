use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::common::numeric::{
    deserialize_lenient_f64, deserialize_lenient_i64, deserialize_token_count,
};
use crate::display::Quota;
use crate::pricing::{BillingMode, CACHE_READ_DISCOUNT, CACHE_WRITE_PREMIUM};

/// Kind of a usage-log entry, as numbered by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogType {
    #[default]
    Unknown,
    TopUp,
    Consume,
    Manage,
    System,
    Error,
}

impl From<i64> for LogType {
    fn from(value: i64) -> Self {
        match value {
            1 => Self::TopUp,
            2 => Self::Consume,
            3 => Self::Manage,
            4 => Self::System,
            5 => Self::Error,
            _ => Self::Unknown,
        }
    }
}

impl From<LogType> for i64 {
    fn from(log_type: LogType) -> Self {
        match log_type {
            LogType::Unknown => 0,
            LogType::TopUp => 1,
            LogType::Consume => 2,
            LogType::Manage => 3,
            LogType::System => 4,
            LogType::Error => 5,
        }
    }
}

/// Billing metadata as the backend sends it. Every field is optional and
/// numeric fields accept numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogMetadata {
    #[serde(
        default,
        alias = "model_ratio",
        deserialize_with = "deserialize_lenient_f64"
    )]
    pub input_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub output_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub group_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_price_type")]
    pub price_type: BillingMode,
    #[serde(
        default,
        alias = "cache_creation_tokens",
        deserialize_with = "deserialize_token_count"
    )]
    pub cached_write_tokens: u64,
    #[serde(
        default,
        alias = "cache_creation_ratio",
        deserialize_with = "deserialize_lenient_f64"
    )]
    pub cached_write_ratio: Option<f64>,
    #[serde(
        default,
        alias = "cache_tokens",
        deserialize_with = "deserialize_token_count"
    )]
    pub cached_read_tokens: u64,
    #[serde(
        default,
        alias = "cache_ratio",
        deserialize_with = "deserialize_lenient_f64"
    )]
    pub cached_read_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_token_count")]
    pub reasoning_tokens: u64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub reasoning_ratio: Option<f64>,
    /// Quota the request would have cost at group ratio 1, when recorded.
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub original_quota: Option<i64>,
}

impl LogMetadata {
    /// Applies the defaults for every missing field.
    ///
    /// `input_ratio` stays optional: its absence is what marks a record as
    /// having no price detail.
    pub fn resolve(&self) -> ResolvedMetadata {
        let input = self.input_ratio.unwrap_or(0.0);
        ResolvedMetadata {
            input_ratio: self.input_ratio,
            output_ratio: self.output_ratio.unwrap_or(input),
            group_ratio: self.group_ratio.unwrap_or(1.0),
            mode: self.price_type,
            cached_write_tokens: self.cached_write_tokens,
            cached_write_ratio: self.cached_write_ratio.unwrap_or(CACHE_WRITE_PREMIUM),
            cached_read_tokens: self.cached_read_tokens,
            cached_read_ratio: self.cached_read_ratio.unwrap_or(CACHE_READ_DISCOUNT),
            reasoning_tokens: self.reasoning_tokens,
            reasoning_ratio: self.reasoning_ratio.unwrap_or(1.0),
            original_quota: self.original_quota.map(Quota::new),
        }
    }
}

/// Metadata with defaults applied, produced once when a record is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMetadata {
    pub input_ratio: Option<f64>,
    pub output_ratio: f64,
    pub group_ratio: f64,
    pub mode: BillingMode,
    pub cached_write_tokens: u64,
    pub cached_write_ratio: f64,
    pub cached_read_tokens: u64,
    pub cached_read_ratio: f64,
    pub reasoning_tokens: u64,
    pub reasoning_ratio: f64,
    pub original_quota: Option<Quota>,
}

impl Default for ResolvedMetadata {
    fn default() -> Self {
        LogMetadata::default().resolve()
    }
}

/// One usage-log row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogRecord {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub id: Option<i64>,
    #[serde(rename = "type", default, deserialize_with = "deserialize_log_type")]
    pub log_type: LogType,
    #[serde(default, deserialize_with = "deserialize_quota")]
    pub quota: Option<Quota>,
    #[serde(default, deserialize_with = "deserialize_token_count")]
    pub prompt_tokens: u64,
    #[serde(default, deserialize_with = "deserialize_token_count")]
    pub completion_tokens: u64,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default, alias = "other", deserialize_with = "deserialize_metadata")]
    pub metadata: Option<ResolvedMetadata>,
}

impl LogRecord {
    pub fn new(log_type: LogType) -> Self {
        Self {
            log_type,
            ..Default::default()
        }
    }

    pub fn with_quota(mut self, quota: impl Into<Quota>) -> Self {
        self.quota = Some(quota.into());
        self
    }

    pub fn with_tokens(mut self, prompt_tokens: u64, completion_tokens: u64) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.completion_tokens = completion_tokens;
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: LogMetadata) -> Self {
        self.metadata = Some(metadata.resolve());
        self
    }

    /// Recorded quota, zero when absent.
    pub fn quota_or_zero(&self) -> Quota {
        self.quota.unwrap_or_default()
    }
}

fn deserialize_log_type<'de, D>(deserializer: D) -> Result<LogType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_i64(deserializer)?
        .map(LogType::from)
        .unwrap_or_default())
}

fn deserialize_quota<'de, D>(deserializer: D) -> Result<Option<Quota>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_i64(deserializer)?.map(Quota::new))
}

fn deserialize_price_type<'de, D>(deserializer: D) -> Result<BillingMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(BillingMode::from_price_type(
        value.as_ref().and_then(Value::as_str),
    ))
}

/// Metadata arrives either as an object or as a JSON-encoded string.
/// Anything undecodable is treated as missing.
fn deserialize_metadata<'de, D>(deserializer: D) -> Result<Option<ResolvedMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    let metadata = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => serde_json::from_str::<LogMetadata>(&raw)
            .inspect_err(|e| tracing::warn!(error = %e, "Undecodable log metadata string"))
            .ok(),
        Some(value @ Value::Object(_)) => serde_json::from_value::<LogMetadata>(value)
            .inspect_err(|e| tracing::warn!(error = %e, "Undecodable log metadata object"))
            .ok(),
        _ => None,
    };
    Ok(metadata.map(|m| m.resolve()))
}
