//! Process configuration for the storage layer.
//!
//! The only configurable behavior in the core is the *default sub-storage
//! key*: one key name may be designated so that `Storage::sub_default`
//! resolves without naming a key. The designation is resolved lazily, at
//! most once per process, the first time any sub-storage lookup matches the
//! configured name. That timing is a deliberately preserved legacy behavior:
//! the "default" flag is a process-wide side effect of an arbitrary
//! sub-storage access, not an explicit configuration step.

use crate::storage::DataKey;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Environment variable naming the default sub-storage key.
pub const DEFAULT_STORAGE_ENV: &str = "QUESTLINE_DEFAULT_STORAGE";

/// Configuration for the storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the key eligible to become the default sub-storage key.
    #[serde(default)]
    pub default_sub_storage: Option<String>,
}

impl StorageConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            default_sub_storage: std::env::var(DEFAULT_STORAGE_ENV)
                .ok()
                .filter(|name| !name.is_empty()),
        }
    }

    /// Sets the default sub-storage key name.
    #[must_use]
    pub fn with_default_sub_storage(mut self, name: impl Into<String>) -> Self {
        self.default_sub_storage = Some(name.into());
        self
    }
}

// Global configuration, loaded from the environment on first use.
static CONFIG: RwLock<Option<StorageConfig>> = RwLock::new(None);

// Resolved at most once per process lifetime.
static DEFAULT_SUB_KEY: OnceLock<DataKey> = OnceLock::new();

/// Replaces the process-wide storage configuration.
///
/// Does not undo an already-resolved default sub-storage key.
pub fn configure(config: StorageConfig) {
    *CONFIG.write() = Some(config);
}

/// Returns the current storage configuration, loading it from the
/// environment on first use.
#[must_use]
pub fn current() -> StorageConfig {
    if let Some(config) = CONFIG.read().clone() {
        return config;
    }

    let mut write = CONFIG.write();
    write.get_or_insert_with(StorageConfig::from_env).clone()
}

/// Returns the resolved default sub-storage key, if any lookup has matched
/// the configured name yet.
#[must_use]
pub fn default_sub_key() -> Option<DataKey> {
    DEFAULT_SUB_KEY.get().cloned()
}

/// Feeds the lazy default-key resolution from a sub-storage lookup.
pub(crate) fn note_sub_access(key: &DataKey) {
    if DEFAULT_SUB_KEY.get().is_some() {
        return;
    }

    let matches = current().default_sub_storage.as_deref() == Some(key.name());
    if matches && DEFAULT_SUB_KEY.set(key.clone()).is_ok() {
        tracing::debug!(key = %key, "resolved default sub-storage key");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new();
        assert!(config.default_sub_storage.is_none());
    }

    #[test]
    fn test_storage_config_builder() {
        let config = StorageConfig::new().with_default_sub_storage("PROFILE");
        assert_eq!(config.default_sub_storage.as_deref(), Some("PROFILE"));
    }

    #[test]
    fn test_storage_config_serialization() {
        let config = StorageConfig::new().with_default_sub_storage("PROFILE");
        let json = serde_json::to_string(&config).unwrap();
        let back: StorageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.default_sub_storage.as_deref(), Some("PROFILE"));
    }
}
