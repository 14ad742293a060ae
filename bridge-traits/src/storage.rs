//! Key-Value Storage Abstractions
//!
//! Provides a platform-agnostic trait for small persistent string slots:
//! - Web: `window.localStorage` (see `bridge_wasm::LocalStorageKeyValueStore`)
//! - Native: no persistent slot; [`NoopKeyValueStore`] discards writes
//! - Tests: [`MemoryKeyValueStore`]

use futures::lock::Mutex;
use std::collections::HashMap;

use crate::{error::Result, platform::PlatformSendSync};

/// Persistent string slots keyed by name
///
/// Writes replace the whole value stored under a key; there is no partial
/// update and no atomicity across keys.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn remember(store: &dyn KeyValueStore, json: &str) -> Result<()> {
///     store.set_string("books", json).await
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait KeyValueStore: PlatformSendSync {
    /// Retrieve the value stored under `key`
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`
    async fn delete(&self, key: &str) -> Result<()>;

    /// Whether writes survive the process
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Key-value store for hosts without a browser storage area
///
/// Reads always miss and writes are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopKeyValueStore;

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl KeyValueStore for NoopKeyValueStore {
    async fn get_string(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_string(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

/// Process-local key-value store, mainly for tests
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
