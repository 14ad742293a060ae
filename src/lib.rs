//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-catalog`, `core-runtime`, `core-metadata`).
//! Host applications can depend on `book-catalog-workspace` and enable the
//! documented features without needing to wire each crate individually.

#[cfg(feature = "catalog")]
pub use core_catalog as catalog;

#[cfg(feature = "catalog")]
pub use core_runtime as runtime;

#[cfg(feature = "metadata-lookup")]
pub use core_metadata as metadata;
