//! # Catalog Configuration Module
//!
//! Provides configuration management for the book catalog core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CatalogConfig` holding the platform bridges and settings the catalog needs.
//! It validates eagerly so a misconfigured host fails at startup instead of on
//! the first book operation.
//!
//! ## Platform defaults
//!
//! - Native: relational storage enabled, database under the per-user data
//!   directory (with `desktop-shims`) or `books.db`, `NoopKeyValueStore` for the
//!   fallback slot, `ReqwestHttpClient` for metadata lookups (with
//!   `desktop-shims`).
//! - WebAssembly: relational storage disabled; the host must inject a
//!   `KeyValueStore` (normally `bridge_wasm::LocalStorageKeyValueStore`).
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CatalogConfig;
//!
//! let config = CatalogConfig::builder()
//!     .database_path("/path/to/books.db")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{
    database::DatabaseConfig,
    http::HttpClient,
    storage::KeyValueStore,
    time::{Clock, SystemClock},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage key of the fallback JSON blob
pub const DEFAULT_FALLBACK_STORAGE_KEY: &str = "books";

/// Cover image used when a saved form has no image
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcS8wWQG-P91nnS1e7U0Lg-jkA4rrXiDQZow3Q&s";

/// Google Books volumes endpoint
pub const DEFAULT_GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Core configuration for the book catalog.
///
/// Use [`CatalogConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Relational store connection settings
    pub database: DatabaseConfig,

    /// Try the relational store at all; `false` starts directly in fallback mode
    pub relational_enabled: bool,

    /// Key under which the fallback collection is persisted
    pub fallback_storage_key: String,

    /// Persistent slot for the fallback collection
    pub key_value_store: Arc<dyn KeyValueStore>,

    /// Time source for fallback id assignment
    pub clock: Arc<dyn Clock>,

    /// Image applied to saved forms with an empty image field
    pub placeholder_image: String,

    /// HTTP client for metadata lookups (optional with desktop default)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// External metadata API configuration
    pub metadata_api_config: MetadataApiConfig,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("database", &self.database)
            .field("relational_enabled", &self.relational_enabled)
            .field("fallback_storage_key", &self.fallback_storage_key)
            .field(
                "key_value_store_persistent",
                &self.key_value_store.is_persistent(),
            )
            .field("placeholder_image", &self.placeholder_image)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("metadata_api_config", &self.metadata_api_config)
            .finish()
    }
}

/// Settings for the remote book metadata lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataApiConfig {
    /// Volumes search endpoint
    pub google_books_url: String,

    /// Optional API key appended as `key=` to lookup requests
    pub google_books_api_key: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for MetadataApiConfig {
    fn default() -> Self {
        Self {
            google_books_url: DEFAULT_GOOGLE_BOOKS_URL.to_string(),
            google_books_api_key: None,
            request_timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Fallback storage key is not blank
    /// - Database URL names a database when relational storage is enabled
    /// - Metadata timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.fallback_storage_key.trim().is_empty() {
            return Err(Error::Config(
                "Fallback storage key cannot be empty".to_string(),
            ));
        }

        if self.relational_enabled {
            let url = self.database.database_url.trim();
            if url.is_empty() || url == "sqlite:" {
                return Err(Error::Config("Database path cannot be empty".to_string()));
            }

            if self.database.max_connections == 0 {
                return Err(Error::Config(
                    "Database pool needs at least one connection".to_string(),
                ));
            }
        }

        if self.metadata_api_config.request_timeout_secs == 0 {
            return Err(Error::Config(
                "Metadata request timeout must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`CatalogConfig`]
#[derive(Default)]
pub struct CatalogConfigBuilder {
    database_path: Option<PathBuf>,
    database: Option<DatabaseConfig>,
    relational_enabled: Option<bool>,
    fallback_storage_key: Option<String>,
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    placeholder_image: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    metadata_api_config: Option<MetadataApiConfig>,
}

impl CatalogConfigBuilder {
    /// Sets the SQLite database file path.
    pub fn database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the full database configuration (takes precedence over
    /// `database_path`).
    pub fn database(mut self, config: DatabaseConfig) -> Self {
        self.database = Some(config);
        self
    }

    /// Enables or disables the relational store.
    pub fn relational_enabled(mut self, enabled: bool) -> Self {
        self.relational_enabled = Some(enabled);
        self
    }

    /// Sets the key of the fallback JSON blob.
    pub fn fallback_storage_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_storage_key = Some(key.into());
        self
    }

    /// Sets the persistent slot used by the fallback store.
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Sets the clock used for fallback id assignment.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the image applied to forms saved without one.
    pub fn placeholder_image(mut self, url: impl Into<String>) -> Self {
        self.placeholder_image = Some(url.into());
        self
    }

    /// Sets the HTTP client used for metadata lookups.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the metadata API configuration.
    pub fn metadata_api_config(mut self, config: MetadataApiConfig) -> Self {
        self.metadata_api_config = Some(config);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No `KeyValueStore` was provided on wasm32
    /// - Validation fails (see [`CatalogConfig::validate`])
    pub fn build(self) -> Result<CatalogConfig> {
        let database = match (self.database, self.database_path) {
            (Some(config), _) => config,
            (None, Some(path)) => DatabaseConfig::new(path),
            (None, None) => DatabaseConfig::new(default_database_path()),
        };

        let key_value_store = match self.key_value_store {
            Some(store) => store,
            None => provide_default_key_value_store()?,
        };

        let http_client = match self.http_client {
            Some(client) => Some(client),
            None => provide_default_http_client(),
        };

        let config = CatalogConfig {
            database,
            relational_enabled: self
                .relational_enabled
                .unwrap_or(cfg!(not(target_arch = "wasm32"))),
            fallback_storage_key: self
                .fallback_storage_key
                .unwrap_or_else(|| DEFAULT_FALLBACK_STORAGE_KEY.to_string()),
            key_value_store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            placeholder_image: self
                .placeholder_image
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.to_string()),
            http_client,
            metadata_api_config: self.metadata_api_config.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(feature = "desktop-shims")]
fn default_database_path() -> PathBuf {
    bridge_desktop::default_database_path()
}

#[cfg(not(feature = "desktop-shims"))]
fn default_database_path() -> PathBuf {
    PathBuf::from("books.db")
}

#[cfg(not(target_arch = "wasm32"))]
fn provide_default_key_value_store() -> Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(bridge_traits::storage::NoopKeyValueStore))
}

#[cfg(target_arch = "wasm32")]
fn provide_default_key_value_store() -> Result<Arc<dyn KeyValueStore>> {
    Err(Error::CapabilityMissing {
        capability: "KeyValueStore".to_string(),
        message: "The fallback store needs a browser storage slot. \
                  Inject bridge_wasm::LocalStorageKeyValueStore via .key_value_store()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Option<Arc<dyn HttpClient>> {
    match bridge_desktop::ReqwestHttpClient::new() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "Metadata lookups disabled: no HTTP client");
            None
        }
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Option<Arc<dyn HttpClient>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::storage::MemoryKeyValueStore;
    use bridge_traits::time::FixedClock;

    #[test]
    fn test_builder_defaults() {
        let config = CatalogConfig::builder()
            .database_path("/tmp/books.db")
            .build()
            .unwrap();

        assert_eq!(config.database.database_url, "sqlite:/tmp/books.db");
        assert!(config.relational_enabled);
        assert_eq!(config.fallback_storage_key, DEFAULT_FALLBACK_STORAGE_KEY);
        assert_eq!(config.placeholder_image, DEFAULT_PLACEHOLDER_IMAGE);
        assert!(!config.key_value_store.is_persistent());
        assert_eq!(config.metadata_api_config, MetadataApiConfig::default());
    }

    #[test]
    fn test_database_override_wins_over_path() {
        let config = CatalogConfig::builder()
            .database_path("/tmp/ignored.db")
            .database(DatabaseConfig::in_memory())
            .build()
            .unwrap();

        assert!(config.database.is_in_memory());
    }

    #[test]
    fn test_custom_bridges_are_kept() {
        let config = CatalogConfig::builder()
            .database(DatabaseConfig::in_memory())
            .key_value_store(Arc::new(MemoryKeyValueStore::new()))
            .clock(Arc::new(FixedClock::from_millis(42)))
            .fallback_storage_key("library")
            .build()
            .unwrap();

        assert!(config.key_value_store.is_persistent());
        assert_eq!(config.clock.unix_timestamp_millis(), 42);
        assert_eq!(config.fallback_storage_key, "library");
    }

    #[test]
    fn test_blank_storage_key_is_rejected() {
        let result = CatalogConfig::builder()
            .database(DatabaseConfig::in_memory())
            .fallback_storage_key("   ")
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_database_path_is_rejected() {
        let result = CatalogConfig::builder().database_path("").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_database_path_allowed_without_relational_store() {
        let result = CatalogConfig::builder()
            .database_path("")
            .relational_enabled(false)
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_metadata_timeout_is_rejected() {
        let result = CatalogConfig::builder()
            .database(DatabaseConfig::in_memory())
            .metadata_api_config(MetadataApiConfig {
                request_timeout_secs: 0,
                ..MetadataApiConfig::default()
            })
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
