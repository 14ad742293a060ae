//! # Catalog Facade
//!
//! The entry point used by UI code. A [`Catalog`] owns the storage context
//! ([`BookStore`]) and exposes the five collaborator operations plus form
//! handling.
//!
//! ```ignore
//! let catalog = Catalog::from_config(&config);
//! catalog.init_database().await;
//! let id = catalog.add_book(&BookDraft::new("Dune", "Frank Herbert")).await?;
//! let books = catalog.get_books().await;
//! ```

use core_runtime::config::{CatalogConfig, DEFAULT_PLACEHOLDER_IMAGE};
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::{BackendMode, BackendSelector, DatabaseConnector, UnavailableConnector};
use crate::error::{CatalogError, Result};
use crate::fallback::FallbackStore;
use crate::models::{Book, BookDraft, BookForm, BookId};
use crate::repositories::{BookRepository, BookStore, ReadOutcome};

#[derive(Debug)]
pub struct Catalog {
    store: BookStore,
    placeholder_image: String,
}

impl Catalog {
    /// Assemble a catalog from an explicit connector and fallback store
    pub fn new(connector: Arc<dyn DatabaseConnector>, fallback: FallbackStore) -> Self {
        Self {
            store: BookStore::new(BackendSelector::new(connector), fallback),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }

    /// Build a catalog from validated configuration
    ///
    /// Uses SQLite when relational storage is enabled on a native target;
    /// otherwise the catalog goes straight to the fallback store.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let fallback = FallbackStore::new(
            Arc::clone(&config.key_value_store),
            config.fallback_storage_key.clone(),
            Arc::clone(&config.clock),
        );

        info!(
            relational_enabled = config.relational_enabled,
            database_url = %config.database.database_url,
            fallback_key = %config.fallback_storage_key,
            "Creating book catalog"
        );

        Self::new(connector_for(config), fallback).with_placeholder_image(&config.placeholder_image)
    }

    pub fn with_placeholder_image(mut self, url: impl Into<String>) -> Self {
        self.placeholder_image = url.into();
        self
    }

    /// Select and prepare the storage backend
    ///
    /// Never fails: an unusable relational store silently switches the
    /// catalog to the fallback store for the rest of its life.
    pub async fn init_database(&self) -> BackendMode {
        self.store.initialize().await
    }

    /// All books, newest first; read failures yield the best stale data
    pub async fn get_books(&self) -> Vec<Book> {
        self.list_books().await.into_inner()
    }

    /// All books, newest first, reporting whether the data is degraded
    pub async fn list_books(&self) -> ReadOutcome<Vec<Book>> {
        self.store.list().await
    }

    pub async fn add_book(&self, draft: &BookDraft) -> Result<BookId> {
        self.store.create(draft).await
    }

    pub async fn update_book(&self, id: BookId, draft: &BookDraft) -> Result<()> {
        self.store.update(id, draft).await
    }

    pub async fn delete_book(&self, id: BookId) -> Result<()> {
        self.store.delete(id).await
    }

    /// Validate a submitted form and create or update accordingly
    ///
    /// Returns the id of the created or edited book.
    ///
    /// # Errors
    /// `CatalogError::InvalidInput` when title or author is blank, otherwise
    /// any write failure.
    pub async fn save_form(&self, edit_id: Option<BookId>, form: BookForm) -> Result<BookId> {
        let draft = form.into_draft(&self.placeholder_image);
        draft
            .validate()
            .map_err(|(field, message)| CatalogError::InvalidInput {
                field: field.to_string(),
                message,
            })?;

        match edit_id {
            Some(id) => {
                debug!(book_id = %id, "Saving edited book");
                self.update_book(id, &draft).await?;
                Ok(id)
            }
            None => self.add_book(&draft).await,
        }
    }

    pub async fn backend_mode(&self) -> BackendMode {
        self.store.mode().await
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    pub fn repository(&self) -> &BookStore {
        &self.store
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn connector_for(config: &CatalogConfig) -> Arc<dyn DatabaseConnector> {
    if config.relational_enabled {
        Arc::new(crate::adapters::SqliteConnector::new(config.database.clone()))
    } else {
        Arc::new(UnavailableConnector::new("relational storage disabled"))
    }
}

#[cfg(target_arch = "wasm32")]
fn connector_for(_config: &CatalogConfig) -> Arc<dyn DatabaseConnector> {
    Arc::new(UnavailableConnector::new(
        "no relational store in the browser",
    ))
}
