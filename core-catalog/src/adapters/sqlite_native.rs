//! Native SQLite Database Adapter
//!
//! Implements the `DatabaseAdapter` trait using `sqlx` with the native SQLite driver.
//! This implementation is used on native platforms (desktop, iOS, Android).
//!
//! ## Features
//!
//! - Connection pooling with configurable limits
//! - WAL mode for concurrent readers alongside the single writer
//! - Prepared statement caching
//! - Rowid returned from the connection that ran the insert

use async_trait::async_trait;
use bridge_traits::database::{
    DatabaseAdapter, DatabaseConfig, DatabaseStatistics, QueryRow, QueryValue,
};
use bridge_traits::error::{BridgeError, Result};
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
    SqliteSynchronous,
};
use sqlx::{Column, Pool, Row, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::backend::DatabaseConnector;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Native SQLite implementation of DatabaseAdapter
///
/// This adapter wraps a `sqlx::Pool<Sqlite>`. Cloning the adapter shares the
/// pool.
#[derive(Clone)]
pub struct SqliteAdapter {
    pool: Pool<Sqlite>,
    config: DatabaseConfig,
}

impl SqliteAdapter {
    /// Open the connection pool described by `config`
    ///
    /// Creates the database file when missing (but never its parent
    /// directory) and runs a health check before returning.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::DatabaseError` if the URL is invalid, the file
    /// cannot be opened, or the health check fails.
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        info!(
            database_url = %config.database_url,
            min_connections = config.min_connections,
            max_connections = config.max_connections,
            "Opening SQLite book store"
        );

        let mut connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| BridgeError::DatabaseError(format!("Invalid database URL: {}", e)))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        if config.enable_cache {
            connect_options = connect_options.statement_cache_capacity(config.cache_capacity);
        }

        let pool = SqlitePoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(config.idle_timeout_secs.map(Duration::from_secs))
            .max_lifetime(config.max_lifetime_secs.map(Duration::from_secs))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create connection pool");
                BridgeError::DatabaseError(format!("Connection pool creation failed: {}", e))
            })?;

        let adapter = Self { pool, config };
        adapter.health_check().await?;

        info!(
            connections = adapter.pool.size(),
            "SQLite connection pool ready"
        );

        Ok(adapter)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            config: DatabaseConfig::default(),
        }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    fn row_to_query_row(row: &SqliteRow) -> QueryRow {
        let mut result = HashMap::new();

        for column in row.columns() {
            let ordinal = column.ordinal();

            let value = if let Ok(v) = row.try_get::<Option<i64>, _>(ordinal) {
                v.map(QueryValue::Integer).unwrap_or(QueryValue::Null)
            } else if let Ok(v) = row.try_get::<Option<f64>, _>(ordinal) {
                v.map(QueryValue::Real).unwrap_or(QueryValue::Null)
            } else if let Ok(v) = row.try_get::<Option<String>, _>(ordinal) {
                v.map(QueryValue::Text).unwrap_or(QueryValue::Null)
            } else if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(ordinal) {
                v.map(QueryValue::Blob).unwrap_or(QueryValue::Null)
            } else {
                QueryValue::Null
            };

            result.insert(column.name().to_string(), value);
        }

        result
    }

    fn bind_params<'q>(query: SqliteQuery<'q>, params: &'q [QueryValue]) -> SqliteQuery<'q> {
        params.iter().fold(query, |query, param| match param {
            QueryValue::Null => query.bind(None::<i64>),
            QueryValue::Integer(i) => query.bind(*i),
            QueryValue::Real(r) => query.bind(*r),
            QueryValue::Text(s) => query.bind(s.as_str()),
            QueryValue::Blob(b) => query.bind(b.as_slice()),
        })
    }
}

#[async_trait]
impl DatabaseAdapter for SqliteAdapter {
    async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");

        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Database health check failed");
                BridgeError::DatabaseError(format!("Health check failed: {}", e))
            })?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        info!("Closing database connection pool");
        self.pool.close().await;
        Ok(())
    }

    async fn query(&self, query: &str, params: &[QueryValue]) -> Result<Vec<QueryRow>> {
        debug!(query = %query.trim(), param_count = params.len(), "Executing query");

        let rows = Self::bind_params(sqlx::query(query), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows.iter().map(Self::row_to_query_row).collect())
    }

    async fn execute(&self, statement: &str, params: &[QueryValue]) -> Result<u64> {
        debug!(statement = %statement.trim(), param_count = params.len(), "Executing statement");

        let result = Self::bind_params(sqlx::query(statement), params)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Execute failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn insert(&self, statement: &str, params: &[QueryValue]) -> Result<i64> {
        debug!(statement = %statement.trim(), param_count = params.len(), "Executing insert");

        let result = Self::bind_params(sqlx::query(statement), params)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Insert failed: {}", e)))?;

        Ok(result.last_insert_rowid())
    }

    async fn get_statistics(&self) -> Result<DatabaseStatistics> {
        let total_connections = self.pool.size();
        let idle_connections = self.pool.num_idle() as u32;

        let database_size_bytes = self
            .query(
                "SELECT page_count * page_size AS size FROM pragma_page_count(), pragma_page_size()",
                &[],
            )
            .await
            .ok()
            .and_then(|rows| rows.first().and_then(|row| row.get("size")?.as_i64()))
            .and_then(|size| u64::try_from(size).ok());

        Ok(DatabaseStatistics {
            total_connections,
            idle_connections,
            active_connections: total_connections.saturating_sub(idle_connections),
            database_size_bytes,
            cached_statements: if self.config.enable_cache {
                self.config.cache_capacity
            } else {
                0
            },
        })
    }
}

/// Opens a [`SqliteAdapter`] for the backend selector
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    config: DatabaseConfig,
}

impl SqliteConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DatabaseConnector for SqliteConnector {
    async fn connect(&self) -> Result<Arc<dyn DatabaseAdapter>> {
        let adapter = SqliteAdapter::new(self.config.clone()).await?;
        Ok(Arc::new(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_adapter() -> SqliteAdapter {
        SqliteAdapter::new(DatabaseConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_in_memory() {
        let adapter = create_test_adapter().await;
        assert!(adapter.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_open_in_missing_directory_fails() {
        let config = DatabaseConfig::new("/nonexistent-book-catalog-dir/nested/books.db");
        let result = SqliteAdapter::new(config).await;
        assert!(matches!(result, Err(BridgeError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_query_maps_columns() {
        let adapter = create_test_adapter().await;
        let rows = adapter
            .query("SELECT 1 AS value, 'x' AS label", &[])
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("value").and_then(QueryValue::as_i64), Some(1));
        assert_eq!(rows[0].get("label").and_then(QueryValue::as_str), Some("x"));
    }

    #[tokio::test]
    async fn test_insert_returns_rowid() {
        let adapter = create_test_adapter().await;
        adapter
            .execute(
                "CREATE TABLE test (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
                &[],
            )
            .await
            .unwrap();

        let first = adapter
            .insert("INSERT INTO test (name) VALUES (?)", &["a".into()])
            .await
            .unwrap();
        let second = adapter
            .insert("INSERT INTO test (name) VALUES (?)", &["b".into()])
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_execute_reports_rows_affected() {
        let adapter = create_test_adapter().await;
        adapter
            .execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .await
            .unwrap();
        adapter
            .execute(
                "INSERT INTO test (id, name) VALUES (?, ?)",
                &[QueryValue::Integer(1), "a".into()],
            )
            .await
            .unwrap();

        let updated = adapter
            .execute(
                "UPDATE test SET name = ? WHERE id = ?",
                &["b".into(), QueryValue::Integer(1)],
            )
            .await
            .unwrap();
        let missing = adapter
            .execute(
                "UPDATE test SET name = ? WHERE id = ?",
                &["c".into(), QueryValue::Integer(99)],
            )
            .await
            .unwrap();

        assert_eq!(updated, 1);
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    async fn test_statement_error_is_database_error() {
        let adapter = create_test_adapter().await;
        let result = adapter.query("SELECT * FROM missing_table", &[]).await;
        assert!(matches!(result, Err(BridgeError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_get_statistics() {
        let adapter = create_test_adapter().await;
        let stats = adapter.get_statistics().await.unwrap();

        assert!(stats.total_connections > 0);
        assert_eq!(stats.cached_statements, 100);
    }

    #[tokio::test]
    async fn test_connector_opens_adapter() {
        let connector = SqliteConnector::new(DatabaseConfig::in_memory());
        let adapter = connector.connect().await.unwrap();
        assert!(adapter.health_check().await.is_ok());
    }
}
