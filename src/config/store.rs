//! Settings store trait

use serde::{Serialize, de::DeserializeOwned};

use super::{ConfigError, ConfigResult};

/// Key/value store holding persisted console settings.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &str;

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>>;

    async fn set_raw(&self, key: &str, value: &str) -> ConfigResult<()>;

    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> ConfigResult<bool>;

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>>;
}

/// Typed access on top of the raw string values.
pub trait SettingsStoreExt: SettingsStore {
    /// Reads a JSON-encoded value.
    fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<Option<T>>> + Send
    where
        Self: Sync,
    {
        async move {
            match self.get_raw(key).await? {
                Some(raw) => {
                    let value: T =
                        serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl std::future::Future<Output = ConfigResult<()>> + Send
    where
        Self: Sync,
    {
        async move {
            let raw = serde_json::to_string(value)?;
            self.set_raw(key, &raw).await
        }
    }

    /// Like [`SettingsStore::get_raw`] but a missing key is an error.
    fn require(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<String>> + Send
    where
        Self: Sync,
    {
        async move {
            self.get_raw(key).await?.ok_or_else(|| ConfigError::NotFound {
                key: key.to_string(),
            })
        }
    }
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {}
