//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux):
//! - `HttpClient` using `reqwest`
//! - default database location under the per-user data directory
//!
//! The relational adapter itself lives in `core-catalog` next to the schema it
//! serves. Desktop hosts have no browser storage area, so the fallback store
//! uses `bridge_traits::NoopKeyValueStore`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{default_database_path, ReqwestHttpClient};
//!
//! let http_client = ReqwestHttpClient::new()?;
//! let db_path = default_database_path();
//! ```

mod http;
mod paths;

pub use http::ReqwestHttpClient;
pub use paths::{data_directory, default_database_path};
