#![cfg(not(target_arch = "wasm32"))]

use async_trait::async_trait;
use bridge_traits::database::{DatabaseAdapter, DatabaseConfig};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::{KeyValueStore, MemoryKeyValueStore};
use bridge_traits::time::{Clock, FixedClock};
use core_catalog::adapters::SqliteAdapter;
use core_catalog::fallback::{decode_books, encode_books};
use core_catalog::{
    BackendMode, Book, BookDraft, BookId, Catalog, CatalogError, DatabaseConnector, FallbackStore,
    UnavailableConnector,
};
use core_runtime::config::CatalogConfig;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock that advances one millisecond per reading
struct SteppingClock(AtomicI64);

impl Clock for SteppingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        let millis = self.0.fetch_add(1, Ordering::SeqCst);
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis).unwrap_or_default()
    }
}

/// Opens once, then the test keeps the adapter to sabotage the store
struct SharedConnector(Arc<SqliteAdapter>);

#[async_trait]
impl DatabaseConnector for SharedConnector {
    async fn connect(&self) -> BridgeResult<Arc<dyn DatabaseAdapter>> {
        Ok(self.0.clone())
    }
}

struct FailingConnector;

#[async_trait]
impl DatabaseConnector for FailingConnector {
    async fn connect(&self) -> BridgeResult<Arc<dyn DatabaseAdapter>> {
        Err(BridgeError::DatabaseError(
            "unable to open database file".to_string(),
        ))
    }
}

/// Key/value store whose reads take several scheduler turns
struct SlowReadStore(MemoryKeyValueStore);

#[async_trait]
impl KeyValueStore for SlowReadStore {
    async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        self.0.get_string(key).await
    }
    async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.0.set_string(key, value).await
    }
    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.0.delete(key).await
    }
}

fn dune() -> BookDraft {
    BookDraft::new("Dune", "Frank Herbert")
        .with_category("Sci-Fi")
        .with_year(1965)
        .with_description("A desert planet and its spice.")
        .with_image("https://example.com/dune.jpg")
}

fn relational_catalog() -> Catalog {
    let config = CatalogConfig::builder()
        .database(DatabaseConfig::in_memory())
        .build()
        .unwrap();
    Catalog::from_config(&config)
}

fn fallback_catalog(kv: Arc<MemoryKeyValueStore>) -> Catalog {
    let fallback = FallbackStore::new(
        kv,
        "books",
        Arc::new(SteppingClock(AtomicI64::new(1_700_000_000_000))),
    );
    Catalog::new(Arc::new(FailingConnector), fallback)
}

async fn dune_scenario(catalog: &Catalog) {
    let id = catalog.add_book(&dune()).await.unwrap();

    let books = catalog.get_books().await;
    assert_eq!(books[0], Book::from_draft(id, dune()));

    catalog
        .update_book(id, &dune().with_year(1966))
        .await
        .unwrap();
    let books = catalog.get_books().await;
    let updated = books.iter().find(|book| book.id == id).unwrap();
    assert_eq!(updated.year, 1966);
    assert_eq!(updated.draft(), dune().with_year(1966));

    catalog.delete_book(id).await.unwrap();
    assert!(catalog.get_books().await.iter().all(|book| book.id != id));
}

#[tokio::test]
async fn test_dune_scenario_relational() {
    let catalog = relational_catalog();
    assert_eq!(catalog.init_database().await, BackendMode::Relational);
    dune_scenario(&catalog).await;
}

#[tokio::test]
async fn test_dune_scenario_fallback() {
    let catalog = fallback_catalog(Arc::new(MemoryKeyValueStore::new()));
    assert_eq!(catalog.init_database().await, BackendMode::Fallback);
    dune_scenario(&catalog).await;
}

#[tokio::test]
async fn test_unopenable_database_path_degrades_to_fallback() {
    let config = CatalogConfig::builder()
        .database_path("/nonexistent-book-catalog-dir/nested/books.db")
        .key_value_store(Arc::new(MemoryKeyValueStore::new()))
        .build()
        .unwrap();
    let catalog = Catalog::from_config(&config);

    assert_eq!(catalog.init_database().await, BackendMode::Fallback);

    let first = catalog.add_book(&dune()).await.unwrap();
    let second = catalog
        .add_book(&BookDraft::new("Emma", "Jane Austen"))
        .await
        .unwrap();

    let books = catalog.get_books().await;
    assert_eq!(books[0].id, second);
    assert_eq!(books[1].id, first);

    catalog.update_book(first, &dune().with_year(1966)).await.unwrap();
    catalog.delete_book(second).await.unwrap();

    let books = catalog.get_books().await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].year, 1966);
    assert_eq!(catalog.backend_mode().await, BackendMode::Fallback);
}

#[tokio::test]
async fn test_list_reflects_surviving_records() {
    for catalog in [
        relational_catalog(),
        fallback_catalog(Arc::new(MemoryKeyValueStore::new())),
    ] {
        catalog.init_database().await;

        let a = catalog.add_book(&BookDraft::new("A", "Author A")).await.unwrap();
        let b = catalog.add_book(&BookDraft::new("B", "Author B")).await.unwrap();
        let c = catalog.add_book(&BookDraft::new("C", "Author C")).await.unwrap();

        catalog
            .update_book(a, &BookDraft::new("A2", "Author A").with_year(2001))
            .await
            .unwrap();
        catalog.delete_book(b).await.unwrap();

        let books = catalog.get_books().await;
        let ids: Vec<BookId> = books.iter().map(|book| book.id).collect();
        assert_eq!(ids, vec![c, a]);
        assert_eq!(books[1].title, "A2");
        assert_eq!(books[1].year, 2001);
    }
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    for catalog in [
        relational_catalog(),
        fallback_catalog(Arc::new(MemoryKeyValueStore::new())),
    ] {
        catalog.init_database().await;

        let mut seen = HashSet::new();
        for i in 0..25 {
            let id = catalog
                .add_book(&BookDraft::new(format!("Book {}", i), "Author"))
                .await
                .unwrap();
            assert!(seen.insert(id), "id {} returned twice", id);
        }
    }
}

#[tokio::test]
async fn test_fallback_ids_unique_with_frozen_clock() {
    let fallback = FallbackStore::new(
        Arc::new(MemoryKeyValueStore::new()),
        "books",
        Arc::new(FixedClock::from_millis(1_700_000_000_000)),
    );
    let catalog = Catalog::new(Arc::new(UnavailableConnector::new("test")), fallback);
    catalog.init_database().await;

    let first = catalog.add_book(&dune()).await.unwrap();
    let second = catalog.add_book(&dune()).await.unwrap();

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_unknown_ids_leave_collection_unchanged() {
    for catalog in [
        relational_catalog(),
        fallback_catalog(Arc::new(MemoryKeyValueStore::new())),
    ] {
        catalog.init_database().await;
        catalog.add_book(&dune()).await.unwrap();
        let before = catalog.get_books().await;

        catalog
            .update_book(BookId(424_242), &BookDraft::new("Ghost", "Nobody"))
            .await
            .unwrap();
        catalog.delete_book(BookId(424_242)).await.unwrap();

        assert_eq!(catalog.get_books().await, before);
    }
}

#[tokio::test]
async fn test_fallback_blob_survives_restart() {
    let kv = Arc::new(MemoryKeyValueStore::new());

    let first_run = fallback_catalog(kv.clone());
    first_run.init_database().await;
    let id = first_run.add_book(&dune()).await.unwrap();
    let expected = first_run.get_books().await;

    let second_run = fallback_catalog(kv.clone());
    second_run.init_database().await;
    assert_eq!(second_run.get_books().await, expected);
    assert_eq!(second_run.get_books().await[0].id, id);

    let blob = kv.get_string("books").await.unwrap().unwrap();
    assert_eq!(decode_books(&blob).unwrap(), expected);
}

#[tokio::test]
async fn test_fallback_list_loads_without_init() {
    let persisted = vec![Book::from_draft(BookId(7), dune())];
    let kv = Arc::new(MemoryKeyValueStore::with_entry(
        "books",
        encode_books(&persisted).unwrap(),
    ));

    let catalog = fallback_catalog(kv);
    assert_eq!(catalog.get_books().await, persisted);
}

#[tokio::test]
async fn test_relational_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    let config = CatalogConfig::builder().database_path(&path).build().unwrap();

    let id = {
        let catalog = Catalog::from_config(&config);
        assert_eq!(catalog.init_database().await, BackendMode::Relational);
        catalog.add_book(&dune()).await.unwrap()
    };

    let reopened = Catalog::from_config(&config);
    assert_eq!(reopened.init_database().await, BackendMode::Relational);
    assert_eq!(
        reopened.get_books().await,
        vec![Book::from_draft(id, dune())]
    );
}

#[tokio::test]
async fn test_read_failure_returns_stale_data_not_error() {
    let adapter = Arc::new(SqliteAdapter::new(DatabaseConfig::in_memory()).await.unwrap());
    let catalog = Catalog::new(
        Arc::new(SharedConnector(adapter.clone())),
        FallbackStore::new(
            Arc::new(MemoryKeyValueStore::new()),
            "books",
            Arc::new(FixedClock::from_millis(1)),
        ),
    );
    catalog.init_database().await;
    catalog.add_book(&dune()).await.unwrap();

    adapter.execute("DROP TABLE books", &[]).await.unwrap();

    let outcome = catalog.list_books().await;
    assert!(outcome.is_degraded());
    assert!(matches!(outcome.cause(), Some(CatalogError::Read(_))));
    assert!(catalog.get_books().await.is_empty());
}

#[tokio::test]
async fn test_write_failure_is_returned_and_mode_stays_relational() {
    let adapter = Arc::new(SqliteAdapter::new(DatabaseConfig::in_memory()).await.unwrap());
    let catalog = Catalog::new(
        Arc::new(SharedConnector(adapter.clone())),
        FallbackStore::new(
            Arc::new(MemoryKeyValueStore::new()),
            "books",
            Arc::new(FixedClock::from_millis(1)),
        ),
    );
    catalog.init_database().await;
    adapter.execute("DROP TABLE books", &[]).await.unwrap();

    let result = catalog.add_book(&dune()).await;

    assert!(matches!(
        result,
        Err(CatalogError::Write { operation: "add", .. })
    ));
    assert_eq!(catalog.backend_mode().await, BackendMode::Relational);
}

#[tokio::test]
async fn test_init_database_is_idempotent() {
    let catalog = relational_catalog();
    catalog.init_database().await;
    let id = catalog.add_book(&dune()).await.unwrap();

    assert_eq!(catalog.init_database().await, BackendMode::Relational);
    assert_eq!(catalog.get_books().await[0].id, id);
}

#[tokio::test]
async fn test_concurrent_first_calls_keep_persisted_books() {
    let persisted = vec![Book::from_draft(BookId(1), dune())];
    let kv = Arc::new(SlowReadStore(MemoryKeyValueStore::with_entry(
        "books",
        encode_books(&persisted).unwrap(),
    )));
    let catalog = Catalog::new(
        Arc::new(FailingConnector),
        FallbackStore::new(kv.clone(), "books", Arc::new(FixedClock::from_millis(1_000))),
    );

    let (_, added) = tokio::join!(catalog.init_database(), async {
        catalog.init_database().await;
        catalog.add_book(&BookDraft::new("Emma", "Jane Austen")).await
    });
    let added = added.unwrap();

    let ids: Vec<BookId> = catalog.get_books().await.iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![added, BookId(1)]);

    let blob = kv.get_string("books").await.unwrap().unwrap();
    let stored: Vec<BookId> = decode_books(&blob).unwrap().iter().map(|book| book.id).collect();
    assert_eq!(stored, ids);
}
