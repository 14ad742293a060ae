//! WebAssembly bindings for core-catalog
//!
//! Exposes the catalog to JavaScript under the collaborator names the UI
//! expects (`initDatabase`, `getBooks`, `addBook`, `updateBook`,
//! `deleteBook`). In the browser there is no relational store, so the catalog
//! always serves from the fallback list persisted in `localStorage`.

use crate::catalog::Catalog;
use crate::models::{BookDraft, BookForm, BookId};
use bridge_wasm::LocalStorageKeyValueStore;
use core_runtime::config::{CatalogConfig, DEFAULT_FALLBACK_STORAGE_KEY};
use serde::Serialize;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(context: &str, error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, error))
}

/// Book ids cross the boundary as JS numbers; fallback ids are millisecond
/// timestamps, well inside the safe integer range.
fn book_id(id: f64) -> BookId {
    BookId(id as i64)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsListOutcome<'a> {
    books: &'a [crate::models::Book],
    degraded: bool,
    cause: Option<String>,
}

/// JavaScript-accessible book catalog
#[wasm_bindgen]
pub struct JsCatalog {
    catalog: Catalog,
}

#[wasm_bindgen]
impl JsCatalog {
    /// Create a catalog persisted under `storageKey` (default `"books"`)
    #[wasm_bindgen(constructor)]
    pub fn new(storage_key: Option<String>) -> Result<JsCatalog, JsValue> {
        // Empty namespace keeps the blob under the bare key.
        let store = LocalStorageKeyValueStore::new("")
            .map_err(|e| to_js_error("Browser storage unavailable", e))?;

        let config = CatalogConfig::builder()
            .relational_enabled(false)
            .key_value_store(Arc::new(store))
            .fallback_storage_key(
                storage_key.unwrap_or_else(|| DEFAULT_FALLBACK_STORAGE_KEY.to_string()),
            )
            .build()
            .map_err(|e| to_js_error("Invalid catalog configuration", e))?;

        Ok(JsCatalog {
            catalog: Catalog::from_config(&config),
        })
    }

    /// Load persisted books; must run before any other call
    #[wasm_bindgen(js_name = initDatabase)]
    pub async fn init_database(&self) -> String {
        self.catalog.init_database().await.to_string()
    }

    /// Array of books, newest first
    #[wasm_bindgen(js_name = getBooks)]
    pub async fn get_books(&self) -> Result<JsValue, JsValue> {
        let books = self.catalog.get_books().await;
        serde_wasm_bindgen::to_value(&books).map_err(|e| to_js_error("Failed to convert books", e))
    }

    /// `{ books, degraded, cause }`
    #[wasm_bindgen(js_name = listBooks)]
    pub async fn list_books(&self) -> Result<JsValue, JsValue> {
        let outcome = self.catalog.list_books().await;
        let view = JsListOutcome {
            books: outcome.as_ref(),
            degraded: outcome.is_degraded(),
            cause: outcome.cause().map(ToString::to_string),
        };
        serde_wasm_bindgen::to_value(&view).map_err(|e| to_js_error("Failed to convert books", e))
    }

    /// Add a book from `{ title, author, category, year, description, image }`
    #[wasm_bindgen(js_name = addBook)]
    pub async fn add_book(&self, fields: JsValue) -> Result<f64, JsValue> {
        let draft: BookDraft = serde_wasm_bindgen::from_value(fields)
            .map_err(|e| to_js_error("Invalid book fields", e))?;

        let id = self
            .catalog
            .add_book(&draft)
            .await
            .map_err(|e| to_js_error("Failed to add book", e))?;

        Ok(id.value() as f64)
    }

    #[wasm_bindgen(js_name = updateBook)]
    pub async fn update_book(&self, id: f64, fields: JsValue) -> Result<(), JsValue> {
        let draft: BookDraft = serde_wasm_bindgen::from_value(fields)
            .map_err(|e| to_js_error("Invalid book fields", e))?;

        self.catalog
            .update_book(book_id(id), &draft)
            .await
            .map_err(|e| to_js_error("Failed to update book", e))
    }

    #[wasm_bindgen(js_name = deleteBook)]
    pub async fn delete_book(&self, id: f64) -> Result<(), JsValue> {
        self.catalog
            .delete_book(book_id(id))
            .await
            .map_err(|e| to_js_error("Failed to delete book", e))
    }

    /// Validate and save an edit form; `editId` is `undefined` for new books
    #[wasm_bindgen(js_name = saveForm)]
    pub async fn save_form(&self, edit_id: Option<f64>, form: JsValue) -> Result<f64, JsValue> {
        let form: BookForm = serde_wasm_bindgen::from_value(form)
            .map_err(|e| to_js_error("Invalid book form", e))?;

        let id = self
            .catalog
            .save_form(edit_id.map(book_id), form)
            .await
            .map_err(|e| to_js_error("Failed to save book", e))?;

        Ok(id.value() as f64)
    }

    #[wasm_bindgen(js_name = backendMode)]
    pub async fn backend_mode(&self) -> String {
        self.catalog.backend_mode().await.to_string()
    }
}
