//! Database Abstraction Layer
//!
//! Provides a platform-agnostic trait for relational storage so the catalog
//! core can route book operations without a hard dependency on a specific
//! SQLite driver:
//! - Native: SQLite via sqlx (`core_catalog::adapters::SqliteAdapter`)
//! - WebAssembly: no relational driver; the core degrades to its fallback store
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::database::{DatabaseAdapter, QueryValue};
//!
//! let rows = adapter
//!     .query("SELECT * FROM books WHERE id = ?", &[QueryValue::Integer(7)])
//!     .await?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{error::Result, platform::PlatformSendSync};

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration for cross-platform initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database file path or connection string
    pub database_url: String,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,

    /// Close idle connections after this many seconds (`None` keeps them open)
    pub idle_timeout_secs: Option<u64>,

    /// Recycle connections after this many seconds (`None` keeps them forever)
    pub max_lifetime_secs: Option<u64>,

    /// Enable statement caching
    pub enable_cache: bool,

    /// Statement cache capacity
    pub cache_capacity: usize,
}

impl DatabaseConfig {
    /// Create a new database configuration with the given file path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        let database_url = format!("sqlite:{}", path.display());

        Self {
            database_url,
            min_connections: 1,
            max_connections: 5,
            acquire_timeout_secs: 30,
            idle_timeout_secs: Some(600),
            max_lifetime_secs: Some(1800),
            enable_cache: true,
            cache_capacity: 100,
        }
    }

    /// Create a configuration for an in-memory database
    ///
    /// Every pooled connection to `sqlite::memory:` sees its own private
    /// database, so the pool is pinned to a single connection that never
    /// expires.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: None,
            max_lifetime_secs: None,
            enable_cache: true,
            cache_capacity: 100,
        }
    }

    /// Whether this configuration points at a transient in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

// =============================================================================
// Query Result Types
// =============================================================================

/// Represents a single row from a database query as a map of column names to values
pub type QueryRow = std::collections::HashMap<String, QueryValue>;

/// Represents a database value that can be null, integer, real, text, or blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl QueryValue {
    /// Convert to i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to String if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

/// Connection pool and file statistics reported by an adapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseStatistics {
    pub total_connections: u32,
    pub idle_connections: u32,
    pub active_connections: u32,
    pub database_size_bytes: Option<u64>,
    pub cached_statements: usize,
}

// =============================================================================
// Database Adapter Trait
// =============================================================================

/// Database adapter trait for cross-platform relational storage
///
/// ## Thread Safety
///
/// Implementations must be thread-safe on native targets (`Send + Sync`). On
/// WASM the trait relaxes those bounds automatically.
///
/// ## Atomicity
///
/// Every method runs exactly one statement. Callers rely on the store's own
/// per-statement atomicity; there are no multi-statement transactions.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait DatabaseAdapter: PlatformSendSync {
    /// Check if the database connection is healthy
    async fn health_check(&self) -> Result<()>;

    /// Close all database connections
    async fn close(&self) -> Result<()>;

    /// Execute a parameterized SQL query and return rows
    ///
    /// Never concatenate user input directly into the query string.
    async fn query(&self, query: &str, params: &[QueryValue]) -> Result<Vec<QueryRow>>;

    /// Execute a SQL statement that doesn't return rows (UPDATE, DELETE, DDL)
    ///
    /// # Returns
    ///
    /// Number of rows affected
    async fn execute(&self, statement: &str, params: &[QueryValue]) -> Result<u64>;

    /// Execute an INSERT statement and return the rowid it produced
    ///
    /// The rowid is read from the same connection that ran the insert.
    async fn insert(&self, statement: &str, params: &[QueryValue]) -> Result<i64>;

    /// Report pool and file statistics
    async fn get_statistics(&self) -> Result<DatabaseStatistics>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_conversions() {
        let int_val = QueryValue::from(42);
        assert_eq!(int_val.as_i64(), Some(42));
        assert!(int_val.as_str().is_none());

        let text_val = QueryValue::from("hello");
        assert_eq!(text_val.as_str(), Some("hello"));
        assert!(text_val.as_i64().is_none());

        let null_val = QueryValue::Null;
        assert!(null_val.is_null());
        assert!(null_val.as_i64().is_none());
    }

    #[test]
    fn test_in_memory_config_pins_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.idle_timeout_secs, None);
        assert_eq!(config.max_lifetime_secs, None);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_database_config_from_path() {
        let config = DatabaseConfig::new("books.db");
        assert_eq!(config.database_url, "sqlite:books.db");
        assert!(!config.is_in_memory());
    }
}
