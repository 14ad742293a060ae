//! Book repository trait and implementation

use bridge_traits::database::DatabaseAdapter;
use bridge_traits::platform::PlatformSendSync;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendMode, BackendSelector};
use crate::db;
use crate::error::Result;
use crate::fallback::FallbackStore;
use crate::models::{Book, BookDraft, BookId};
use crate::repositories::ReadOutcome;

/// Book repository interface for data access operations
///
/// Callers cannot tell which store served a request.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait BookRepository: PlatformSendSync {
    /// All books, newest first
    ///
    /// Never fails. A failed relational read yields
    /// [`ReadOutcome::Degraded`] carrying the in-memory fallback list.
    async fn list(&self) -> ReadOutcome<Vec<Book>>;

    /// Insert a new book and return its assigned id
    ///
    /// # Errors
    /// Returns `CatalogError::Write` if the relational insert fails. The
    /// fallback store cannot fail.
    async fn create(&self, draft: &BookDraft) -> Result<BookId>;

    /// Replace every field of the book with `id`
    ///
    /// Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns `CatalogError::Write` if the relational update fails.
    async fn update(&self, id: BookId, draft: &BookDraft) -> Result<()>;

    /// Remove the book with `id`
    ///
    /// Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns `CatalogError::Write` if the relational delete fails.
    async fn delete(&self, id: BookId) -> Result<()>;
}

/// Routes book operations to the store chosen by a [`BackendSelector`]
///
/// This is the storage context: it owns the backend mode, the relational
/// handle (through the selector) and the in-memory fallback table.
#[derive(Debug)]
pub struct BookStore {
    selector: BackendSelector,
    fallback: FallbackStore,
}

impl BookStore {
    pub fn new(selector: BackendSelector, fallback: FallbackStore) -> Self {
        Self { selector, fallback }
    }

    /// Select the backend and prepare it
    ///
    /// With a relational handle the `books` table is created if absent
    /// (failures are logged and ignored). On entering fallback mode the
    /// persisted blob is loaded once. Safe to call repeatedly.
    pub async fn initialize(&self) -> BackendMode {
        let acquired = self
            .selector
            .acquire(|handle| self.prepare(handle))
            .await;

        // Repeat calls retry a schema creation that failed earlier.
        if let (Some(adapter), false) = (acquired.handle.as_ref(), acquired.transitioned) {
            if let Err(e) = db::ensure_schema(adapter.as_ref()).await {
                warn!(error = %e, "Continuing without books schema");
            }
        }

        let mode = self.selector.mode().await;
        info!(mode = %mode, "Book store initialized");
        mode
    }

    pub async fn mode(&self) -> BackendMode {
        self.selector.mode().await
    }

    pub fn fallback(&self) -> &FallbackStore {
        &self.fallback
    }

    async fn prepare(&self, handle: Option<Arc<dyn DatabaseAdapter>>) {
        match handle {
            Some(adapter) => {
                if let Err(e) = db::ensure_schema(adapter.as_ref()).await {
                    warn!(error = %e, "Continuing without books schema");
                }
            }
            None => {
                self.fallback.load().await;
            }
        }
    }

    /// Active relational handle, or `None` for the fallback store
    ///
    /// Waits until the selected backend is prepared.
    async fn route(&self) -> Option<Arc<dyn DatabaseAdapter>> {
        self.selector
            .acquire(|handle| self.prepare(handle))
            .await
            .handle
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl BookRepository for BookStore {
    async fn list(&self) -> ReadOutcome<Vec<Book>> {
        let Some(adapter) = self.route().await else {
            return ReadOutcome::Fresh(self.fallback.list().await);
        };

        match db::select_books(adapter.as_ref()).await {
            Ok(books) => {
                debug!(count = books.len(), "Listed books");
                ReadOutcome::Fresh(books)
            }
            Err(cause) => {
                warn!(error = %cause, "Book list failed, serving fallback data");
                ReadOutcome::Degraded {
                    stale: self.fallback.snapshot().await,
                    cause,
                }
            }
        }
    }

    async fn create(&self, draft: &BookDraft) -> Result<BookId> {
        let Some(adapter) = self.route().await else {
            return Ok(self.fallback.insert(draft.clone()).await);
        };

        let id = db::insert_book(adapter.as_ref(), draft)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to add book"))?;

        debug!(book_id = %id, "Added book");
        Ok(id)
    }

    async fn update(&self, id: BookId, draft: &BookDraft) -> Result<()> {
        let Some(adapter) = self.route().await else {
            self.fallback.update(id, draft.clone()).await;
            return Ok(());
        };

        let updated = db::update_book(adapter.as_ref(), id, draft)
            .await
            .inspect_err(|e| error!(error = %e, book_id = %id, "Failed to update book"))?;

        if updated == 0 {
            debug!(book_id = %id, "Update of unknown book ignored");
        }
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let Some(adapter) = self.route().await else {
            self.fallback.delete(id).await;
            return Ok(());
        };

        let deleted = db::delete_book(adapter.as_ref(), id)
            .await
            .inspect_err(|e| error!(error = %e, book_id = %id, "Failed to delete book"))?;

        if deleted == 0 {
            debug!(book_id = %id, "Delete of unknown book ignored");
        }
        Ok(())
    }
}
