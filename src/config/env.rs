//! Environment variable settings store
//!
//! Read-only: environment variables are not mutated at runtime.

use super::store::SettingsStore;
use super::{ConfigError, ConfigResult};

/// Maps `quota_per_unit` to `<PREFIX>QUOTA_PER_UNIT`.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    prefix: Option<String>,
}

impl EnvStore {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn env_key(&self, key: &str) -> String {
        let key = key.to_uppercase().replace('.', "_");
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key,
        }
    }

    fn key_from_env(&self, env_name: &str) -> Option<String> {
        let stripped = match &self.prefix {
            Some(prefix) => env_name.strip_prefix(prefix.as_str())?,
            None => env_name,
        };
        Some(stripped.to_lowercase())
    }

    fn read_only(&self) -> ConfigError {
        ConfigError::ReadOnly {
            store: "env".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for EnvStore {
    fn name(&self) -> &str {
        "env"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        match std::env::var(self.env_key(key)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(e)),
        }
    }

    async fn set_raw(&self, _key: &str, _value: &str) -> ConfigResult<()> {
        Err(self.read_only())
    }

    async fn delete(&self, _key: &str) -> ConfigResult<bool> {
        Err(self.read_only())
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let env_prefix = self.env_key(prefix);
        let mut keys: Vec<String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(&env_prefix))
            .filter_map(|(k, _)| self.key_from_env(&k))
            .collect();
        keys.sort();
        Ok(keys)
    }
}
