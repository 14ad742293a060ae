//! # Repository Pattern Implementation
//!
//! Data access for the catalog's single entity.
//!
//! ## Architecture
//!
//! - `BookRepository` defines list/create/update/delete over `Book`
//! - `BookStore` routes each call to the relational or fallback store chosen
//!   by the `BackendSelector`
//! - Writes return `Result<T>`; reads return [`ReadOutcome`] because a read
//!   failure is answered with stale data instead of an error

use crate::error::CatalogError;

pub mod book;

pub use book::{BookRepository, BookStore};

/// Result of a read that degrades instead of failing
#[derive(Debug)]
pub enum ReadOutcome<T> {
    /// Read straight from the active store
    Fresh(T),
    /// The active store failed; `stale` is the best data still available
    Degraded { stale: T, cause: CatalogError },
}

impl<T> ReadOutcome<T> {
    /// Data regardless of freshness
    pub fn into_inner(self) -> T {
        match self {
            ReadOutcome::Fresh(value) => value,
            ReadOutcome::Degraded { stale, .. } => stale,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ReadOutcome::Degraded { .. })
    }

    /// Why the read degraded, if it did
    pub fn cause(&self) -> Option<&CatalogError> {
        match self {
            ReadOutcome::Fresh(_) => None,
            ReadOutcome::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn as_ref(&self) -> &T {
        match self {
            ReadOutcome::Fresh(value) => value,
            ReadOutcome::Degraded { stale, .. } => stale,
        }
    }
}
