//! # Relational Schema
//!
//! The catalog keeps a single `books` table. There are no migrations beyond
//! creating the table when it is absent.
//!
//! All statements are parameterized; values are bound positionally in schema
//! column order (`title, author, category, year, description, image`).

use bridge_traits::database::{DatabaseAdapter, QueryValue};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::models::{Book, BookDraft, BookId};

pub(crate) const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        author      TEXT NOT NULL,
        category    TEXT NOT NULL,
        year        INTEGER NOT NULL,
        description TEXT NOT NULL,
        image       TEXT NOT NULL
    )
"#;

pub(crate) const SELECT_BOOKS: &str =
    "SELECT id, title, author, category, year, description, image FROM books ORDER BY id DESC";

pub(crate) const INSERT_BOOK: &str = r#"
    INSERT INTO books (title, author, category, year, description, image)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

pub(crate) const UPDATE_BOOK: &str = r#"
    UPDATE books
    SET title = ?, author = ?, category = ?, year = ?, description = ?, image = ?
    WHERE id = ?
"#;

pub(crate) const DELETE_BOOK: &str = "DELETE FROM books WHERE id = ?";

/// Create the `books` table if it does not exist
pub async fn ensure_schema(adapter: &dyn DatabaseAdapter) -> Result<()> {
    debug!("Ensuring books schema");
    adapter
        .execute(CREATE_BOOKS_TABLE, &[])
        .await
        .map_err(CatalogError::SchemaInit)?;
    Ok(())
}

/// All books, newest first
pub(crate) async fn select_books(adapter: &dyn DatabaseAdapter) -> Result<Vec<Book>> {
    let rows = adapter
        .query(SELECT_BOOKS, &[])
        .await
        .map_err(|e| CatalogError::Read(e.to_string()))?;

    rows.iter()
        .map(|row| {
            Book::from_row(row).map_err(|message| {
                warn!(%message, "Malformed books row");
                CatalogError::Read(message)
            })
        })
        .collect()
}

pub(crate) async fn insert_book(adapter: &dyn DatabaseAdapter, draft: &BookDraft) -> Result<BookId> {
    let rowid = adapter
        .insert(INSERT_BOOK, &draft.params())
        .await
        .map_err(|e| CatalogError::write("add", e))?;
    Ok(BookId(rowid))
}

/// Returns the number of rows replaced (0 when `id` is unknown)
pub(crate) async fn update_book(
    adapter: &dyn DatabaseAdapter,
    id: BookId,
    draft: &BookDraft,
) -> Result<u64> {
    let mut params = draft.params();
    params.push(QueryValue::Integer(id.value()));

    adapter
        .execute(UPDATE_BOOK, &params)
        .await
        .map_err(|e| CatalogError::write("update", e))
}

/// Returns the number of rows removed (0 when `id` is unknown)
pub(crate) async fn delete_book(adapter: &dyn DatabaseAdapter, id: BookId) -> Result<u64> {
    adapter
        .execute(DELETE_BOOK, &[QueryValue::Integer(id.value())])
        .await
        .map_err(|e| CatalogError::write("delete", e))
}
