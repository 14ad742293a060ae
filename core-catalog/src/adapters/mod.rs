//! Database adapter implementations
//!
//! Concrete `DatabaseAdapter` implementations and the connectors that open
//! them. Browsers have no relational store, so this is empty on wasm32.

#[cfg(not(target_arch = "wasm32"))]
pub mod sqlite_native;

#[cfg(not(target_arch = "wasm32"))]
pub use sqlite_native::{SqliteAdapter, SqliteConnector};
