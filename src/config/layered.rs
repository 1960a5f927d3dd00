//! Layered settings store
//!
//! Chains stores in priority order; earlier stores win.

use std::collections::BTreeSet;

use super::{ConfigError, ConfigResult};
use super::store::SettingsStore;

#[derive(Default)]
pub struct LayeredStore {
    stores: Vec<Box<dyn SettingsStore>>,
}

impl LayeredStore {
    pub fn new() -> Self {
        Self { stores: Vec::new() }
    }

    /// First added = highest priority.
    pub fn add_store(&mut self, store: Box<dyn SettingsStore>) {
        self.stores.push(store);
    }

    pub fn store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.stores.push(Box::new(store));
        self
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    pub fn store_names(&self) -> Vec<&str> {
        self.stores.iter().map(|s| s.name()).collect()
    }
}

#[async_trait::async_trait]
impl SettingsStore for LayeredStore {
    fn name(&self) -> &str {
        "layered"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        for store in &self.stores {
            if let Some(value) = store.get_raw(key).await? {
                tracing::debug!(key, store = store.name(), "Resolved setting");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Writes go to the highest-priority writable store. Fails with
    /// `ReadOnly` when no store accepts the write.
    async fn set_raw(&self, key: &str, value: &str) -> ConfigResult<()> {
        for store in &self.stores {
            match store.set_raw(key, value).await {
                Ok(()) => {
                    tracing::debug!(key, store = store.name(), "Stored setting");
                    return Ok(());
                }
                Err(ConfigError::ReadOnly { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ConfigError::ReadOnly {
            store: self.name().to_string(),
        })
    }

    /// Deletes from every store holding the key. Read-only stores are
    /// skipped.
    async fn delete(&self, key: &str) -> ConfigResult<bool> {
        let mut deleted = false;
        for store in &self.stores {
            match store.delete(key).await {
                Ok(existed) => deleted |= existed,
                Err(ConfigError::ReadOnly { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(deleted)
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let mut keys = BTreeSet::new();
        for store in &self.stores {
            keys.extend(store.list_keys(prefix).await?);
        }
        Ok(keys.into_iter().collect())
    }
}

impl std::fmt::Debug for LayeredStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredStore")
            .field("store_names", &self.store_names())
            .finish()
    }
}
