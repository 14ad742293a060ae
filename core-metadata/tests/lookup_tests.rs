use async_trait::async_trait;
use bridge_traits::database::DatabaseConfig;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_catalog::{BookForm, Catalog};
use core_metadata::{prefill_form, GoogleBooksClient, MetadataError};
use core_runtime::config::CatalogConfig;
use mockall::mock;
use std::sync::Arc;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

const EMMA_RESPONSE: &str = r#"{
    "totalItems": 1,
    "items": [{
        "volumeInfo": {
            "title": "Emma",
            "authors": ["Jane Austen"],
            "publishedDate": "1815",
            "description": "A novel about youthful hubris.",
            "categories": ["Fiction"],
            "imageLinks": { "thumbnail": "http://books.google.com/emma" }
        }
    }]
}"#;

fn ok(body: &str) -> HttpResponse {
    HttpResponse::new(200, body.to_string())
}

#[tokio::test]
async fn test_lookup_prefills_form_that_saves() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| request.url.contains("q=intitle:emma"))
        .returning(|_| Ok(ok(EMMA_RESPONSE)));

    let config = CatalogConfig::builder()
        .database(DatabaseConfig::in_memory())
        .http_client(Arc::new(http))
        .build()
        .unwrap();
    let lookup = GoogleBooksClient::from_config(&config).unwrap();
    let catalog = Catalog::from_config(&config);
    catalog.init_database().await;

    let mut form = BookForm {
        title: "emma".to_string(),
        ..BookForm::default()
    };
    assert!(prefill_form(&lookup, &mut form).await.unwrap());

    let id = catalog.save_form(None, form).await.unwrap();
    let saved = &catalog.get_books().await[0];

    assert_eq!(saved.id, id);
    assert_eq!(saved.title, "Emma");
    assert_eq!(saved.author, "Jane Austen");
    assert_eq!(saved.year, 1815);
    assert_eq!(saved.image, "https://books.google.com/emma");
}

#[tokio::test]
async fn test_failed_lookup_leaves_form_untouched() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|_| {
        Ok(HttpResponse::new(503, "backend error"))
    });

    let config = CatalogConfig::builder()
        .database(DatabaseConfig::in_memory())
        .http_client(Arc::new(http))
        .build()
        .unwrap();
    let lookup = GoogleBooksClient::from_config(&config).unwrap();

    let mut form = BookForm {
        title: "Emma".to_string(),
        author: "J. Austen".to_string(),
        ..BookForm::default()
    };
    let before = form.clone();

    let result = prefill_form(&lookup, &mut form).await;

    assert!(matches!(result, Err(MetadataError::Http { status: 503, .. })));
    assert_eq!(form, before);
}

#[test]
fn test_from_config_without_http_client() {
    let config = CatalogConfig::builder()
        .database(DatabaseConfig::in_memory())
        .build()
        .unwrap();

    assert!(matches!(
        GoogleBooksClient::from_config(&config),
        Err(MetadataError::NotConfigured(_))
    ));
}
