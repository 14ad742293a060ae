//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host platform implements for the
//! book catalog core.
//!
//! ## Traits
//!
//! - [`DatabaseAdapter`](database::DatabaseAdapter) - Relational storage (SQLite on native)
//! - [`KeyValueStore`](storage::KeyValueStore) - Persistent string slots (`localStorage` on web)
//! - [`HttpClient`](http::HttpClient) - Async HTTP for the metadata lookup
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Relational store | Key-value store |
//! |----------|---------------------|------------------|-----------------|
//! | Desktop  | `bridge-desktop` + `core-catalog` | SQLite via sqlx | no-op |
//! | Web      | `bridge-wasm`       | unavailable      | `localStorage` |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform-specific errors to `BridgeError` and
//! keep the original message for context.
//!
//! ## Thread Safety
//!
//! Bridge traits carry `Send + Sync` bounds on native targets through
//! [`PlatformSendSync`](platform::PlatformSendSync); on wasm32 the bounds are
//! relaxed because browser handles are single-threaded.

pub mod database;
pub mod error;
pub mod http;
pub mod platform;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use database::{DatabaseAdapter, DatabaseConfig, DatabaseStatistics, QueryRow, QueryValue};
pub use http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
pub use platform::PlatformSendSync;
pub use storage::{KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore};
pub use time::{Clock, FixedClock, LogLevel, SystemClock};
