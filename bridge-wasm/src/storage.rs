//! `localStorage`-backed implementation of the key-value bridge.
//!
//! The fallback book store keeps its whole collection as one JSON blob under a
//! single key, so every write replaces that slot. Keys are namespaced so
//! several host shells on the same origin do not clobber each other.

use async_trait::async_trait;
use bridge_traits::{error::Result as BridgeResult, storage::KeyValueStore};
use tracing::debug;

use crate::error::{WasmError, WasmResult};

fn local_storage() -> WasmResult<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| WasmError::NotAvailable("window".into()))?;
    window
        .local_storage()
        .map_err(|err| WasmError::from_js("localStorage", err))?
        .ok_or_else(|| WasmError::NotAvailable("localStorage".into()))
}

fn scoped_key(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{namespace}::{key}")
    }
}

/// Browser-backed key-value store over `window.localStorage`
#[derive(Clone)]
pub struct LocalStorageKeyValueStore {
    storage: web_sys::Storage,
    namespace: String,
}

impl LocalStorageKeyValueStore {
    /// Construct a store scoped to the provided namespace.
    ///
    /// An empty namespace stores keys verbatim.
    pub fn new(namespace: impl Into<String>) -> WasmResult<Self> {
        Ok(Self {
            storage: local_storage()?,
            namespace: namespace.into(),
        })
    }

    fn key_for(&self, key: &str) -> String {
        scoped_key(&self.namespace, key)
    }
}

#[async_trait(?Send)]
impl KeyValueStore for LocalStorageKeyValueStore {
    async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        self.storage
            .get_item(&self.key_for(key))
            .map_err(|err| WasmError::from_js("get_item", err).into())
    }

    async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        debug!(key, bytes = value.len(), "Writing localStorage slot");
        self.storage
            .set_item(&self.key_for(key), value)
            .map_err(|err| WasmError::from_js("set_item", err).into())
    }

    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.storage
            .remove_item(&self.key_for(key))
            .map_err(|err| WasmError::from_js("remove_item", err).into())
    }
}
