//! # Fallback Book Store
//!
//! In-memory, newest-first list of books mirrored to a single JSON array under
//! one key of a [`KeyValueStore`]. Every mutation rewrites the whole blob.
//!
//! Operations here never fail. Persistence errors and undecodable blobs are
//! logged and otherwise ignored, so the in-memory list stays authoritative for
//! the rest of the process.

use bridge_traits::storage::KeyValueStore;
use bridge_traits::time::Clock;
use futures::lock::Mutex;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::models::{Book, BookDraft, BookId};

/// Serialize books into the persisted blob form
pub fn encode_books(books: &[Book]) -> Result<String> {
    Ok(serde_json::to_string(books)?)
}

/// Parse a persisted blob
pub fn decode_books(blob: &str) -> Result<Vec<Book>> {
    Ok(serde_json::from_str(blob)?)
}

pub struct FallbackStore {
    books: Mutex<Vec<Book>>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    clock: Arc<dyn Clock>,
}

impl FallbackStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            store,
            key: key.into(),
            clock,
        }
    }

    /// Replace the in-memory list with the persisted blob
    ///
    /// A missing, unreadable or corrupt blob leaves an empty list.
    pub async fn load(&self) -> usize {
        let books = self.read_blob().await;
        let count = books.len();
        *self.books.lock().await = books;
        debug!(count, key = %self.key, "Loaded fallback books");
        count
    }

    /// Current in-memory list without touching persistence
    pub async fn snapshot(&self) -> Vec<Book> {
        self.books.lock().await.clone()
    }

    /// Current list, reloading from the blob first when memory is empty
    pub async fn list(&self) -> Vec<Book> {
        let mut books = self.books.lock().await;
        if books.is_empty() {
            *books = self.read_blob().await;
        }
        books.clone()
    }

    /// Prepend a new book and persist
    ///
    /// The id is the current clock in milliseconds, bumped past the largest
    /// id already held so ids stay unique even when the clock stalls.
    pub async fn insert(&self, draft: BookDraft) -> BookId {
        let mut books = self.books.lock().await;

        let next_after_max = books
            .iter()
            .map(|book| book.id.value())
            .max()
            .map_or(i64::MIN, |max| max.saturating_add(1));
        let id = BookId(self.clock.unix_timestamp_millis().max(next_after_max));

        books.insert(0, Book::from_draft(id, draft));
        self.persist(&books).await;

        debug!(book_id = %id, "Added book to fallback store");
        id
    }

    /// Replace every field of the book with `id`; returns `false` if absent
    pub async fn update(&self, id: BookId, draft: BookDraft) -> bool {
        let mut books = self.books.lock().await;

        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            debug!(book_id = %id, "Update of unknown fallback book ignored");
            return false;
        };
        book.apply(draft);

        self.persist(&books).await;
        true
    }

    /// Remove the book with `id`; returns `false` if absent
    pub async fn delete(&self, id: BookId) -> bool {
        let mut books = self.books.lock().await;

        let before = books.len();
        books.retain(|book| book.id != id);
        if books.len() == before {
            debug!(book_id = %id, "Delete of unknown fallback book ignored");
            return false;
        }

        self.persist(&books).await;
        true
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }

    async fn read_blob(&self) -> Vec<Book> {
        let blob = match self.store.get_string(&self.key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, key = %self.key, "Failed to read fallback books");
                return Vec::new();
            }
        };

        decode_books(&blob).unwrap_or_else(|e| {
            warn!(error = %e, key = %self.key, "Discarding corrupt fallback books");
            Vec::new()
        })
    }

    async fn persist(&self, books: &[Book]) {
        let blob = match encode_books(books) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "Failed to encode fallback books");
                return;
            }
        };

        if let Err(e) = self.store.set_string(&self.key, &blob).await {
            error!(error = %e, key = %self.key, "Failed to persist fallback books");
        }
    }
}

impl std::fmt::Debug for FallbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackStore")
            .field("key", &self.key)
            .field("persistent", &self.store.is_persistent())
            .finish()
    }
}
