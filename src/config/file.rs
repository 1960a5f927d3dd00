//! JSON file settings store
//!
//! The file holds one object; string values are returned as-is and any
//! other JSON value as its compact encoding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::RwLock;

use super::ConfigResult;
use super::store::SettingsStore;

pub struct FileStore {
    path: PathBuf,
    data: RwLock<Option<BTreeMap<String, Value>>>,
    auto_reload: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: RwLock::new(None),
            auto_reload: false,
        }
    }

    /// Re-reads the file on every access.
    pub fn auto_reload(path: impl Into<PathBuf>) -> Self {
        Self {
            auto_reload: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ConfigResult<BTreeMap<String, Value>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(BTreeMap::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn ensure_loaded(&self) -> ConfigResult<()> {
        let mut data = self.data.write().await;
        if data.is_none() || self.auto_reload {
            *data = Some(self.load().await?);
        }
        Ok(())
    }

    async fn save(&self, data: &BTreeMap<String, Value>) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(data)?).await?;
        tracing::debug!(path = %self.path.display(), "Saved settings file");
        Ok(())
    }

    pub async fn reload(&self) -> ConfigResult<()> {
        *self.data.write().await = Some(self.load().await?);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SettingsStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        self.ensure_loaded().await?;

        let data = self.data.read().await;
        Ok((*data).as_ref().and_then(|map| map.get(key)).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    async fn set_raw(&self, key: &str, value: &str) -> ConfigResult<()> {
        self.ensure_loaded().await?;

        let mut data = self.data.write().await;
        let map = data.get_or_insert_with(BTreeMap::new);
        let json_value =
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        map.insert(key.to_string(), json_value);
        self.save(map).await
    }

    async fn delete(&self, key: &str) -> ConfigResult<bool> {
        self.ensure_loaded().await?;

        let mut data = self.data.write().await;
        let Some(map) = (*data).as_mut() else {
            return Ok(false);
        };
        let existed = map.remove(key).is_some();
        if existed {
            self.save(map).await?;
        }
        Ok(existed)
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        self.ensure_loaded().await?;

        let data = self.data.read().await;
        Ok((*data)
            .iter()
            .flat_map(|map| map.keys())
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("auto_reload", &self.auto_reload)
            .finish()
    }
}
