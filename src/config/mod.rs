//! Persisted console settings.
//!
//! ```rust,no_run
//! use quota_display::config::{SettingsLoader, StoreBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::new()
//!     .env_with_prefix("CONSOLE_")
//!     .file("settings.json")
//!     .build();
//! let settings = SettingsLoader::new(store).load().await?;
//! println!("{}", settings.display.render_quota(1_000_000, 2));
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod file;
pub mod layered;
pub mod memory;
pub mod settings;
pub mod store;

pub use env::EnvStore;
pub use file::FileStore;
pub use layered::LayeredStore;
pub use memory::MemoryStore;
pub use settings::{BillingSettings, SettingsLoader};
pub use store::{SettingsStore, SettingsStoreExt};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Key not found: {key}")]
    NotFound { key: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Settings store '{store}' is read-only")]
    ReadOnly { store: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Assembles a [`LayeredStore`]; stores added first take priority.
#[derive(Default)]
pub struct StoreBuilder {
    stores: Vec<Box<dyn SettingsStore>>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(mut self) -> Self {
        self.stores.push(Box::new(EnvStore::new()));
        self
    }

    pub fn env_with_prefix(mut self, prefix: &str) -> Self {
        self.stores.push(Box::new(EnvStore::prefixed(prefix)));
        self
    }

    pub fn file(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.stores
            .push(Box::new(FileStore::new(path.as_ref().to_path_buf())));
        self
    }

    pub fn memory(mut self, store: MemoryStore) -> Self {
        self.stores.push(Box::new(store));
        self
    }

    pub fn store(mut self, store: Box<dyn SettingsStore>) -> Self {
        self.stores.push(store);
        self
    }

    pub fn build(self) -> LayeredStore {
        let mut layered = LayeredStore::new();
        for store in self.stores {
            layered.add_store(store);
        }
        layered
    }
}
