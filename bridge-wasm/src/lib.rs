//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the bridge traits defined in `bridge-traits`,
//! built on `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! On native targets it compiles to an empty library.
//!
//! # Implementations
//!
//! - `LocalStorageKeyValueStore`: persistent slot for the fallback book store
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::LocalStorageKeyValueStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(LocalStorageKeyValueStore::new("")?);
//! let config = CatalogConfig::builder().key_value_store(store).build()?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod error;
pub mod storage;

pub use error::{WasmError, WasmResult};
pub use storage::LocalStorageKeyValueStore;
