use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Failures raised by the catalog core
///
/// `Open`, `SchemaInit` and `Read` are logged and absorbed by the catalog;
/// callers only see them inside a degraded read outcome. `Write` is returned
/// from create, update and delete.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Relational store unavailable: {0}")]
    Open(#[source] BridgeError),

    #[error("Schema initialization failed: {0}")]
    SchemaInit(#[source] BridgeError),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Failed to {operation} book: {source}")]
    Write {
        operation: &'static str,
        #[source]
        source: BridgeError,
    },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn write(operation: &'static str, source: BridgeError) -> Self {
        CatalogError::Write { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
