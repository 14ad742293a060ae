//! # Book Catalog Storage
//!
//! Owns the book collection and decides where it lives.
//!
//! ## Overview
//!
//! This module manages:
//! - The `books` table in a local SQLite database
//! - A fallback list persisted as one JSON blob in a key/value slot, used when
//!   the database cannot be opened
//! - The one-way switch between the two (`BackendSelector`)
//! - A repository that routes list/create/update/delete to the active store
//!
//! UI code talks to [`Catalog`].

pub mod adapters;
pub mod backend;
pub mod catalog;
pub mod db;
pub mod error;
pub mod fallback;
pub mod models;
pub mod repositories;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use adapters::{SqliteAdapter, SqliteConnector};
pub use backend::{BackendMode, BackendSelector, DatabaseConnector, UnavailableConnector};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use fallback::FallbackStore;
pub use models::{Book, BookDraft, BookForm, BookId};
pub use repositories::{BookRepository, BookStore, ReadOutcome};
