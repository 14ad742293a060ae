//! External Metadata Providers
//!
//! Clients for public book metadata services. Lookups are keyed by the free
//! text a user typed into the title field and only ever pre-populate a form.

pub mod google_books;

pub use google_books::GoogleBooksClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fields a lookup may fill in; every one is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
}

impl BookMetadata {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[async_trait]
pub trait BookMetadataProvider: Send + Sync {
    /// Best match for `title`
    ///
    /// # Returns
    /// - `Ok(Some(metadata))` for the first hit
    /// - `Ok(None)` when the title is blank or nothing matched
    /// - `Err` on transport or HTTP failures
    async fn lookup(&self, title: &str) -> Result<Option<BookMetadata>>;
}
