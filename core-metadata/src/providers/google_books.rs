//! Google Books API Client
//!
//! Looks up a single volume by title through the public volumes search.
//!
//! ## API Endpoint
//!
//! - **Search**: `https://www.googleapis.com/books/v1/volumes?q=intitle:{title}&maxResults=1`
//!
//! An API key is optional for this endpoint; when configured it is sent as
//! `key={key}`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::{BookMetadataProvider, GoogleBooksClient};
//!
//! let client = GoogleBooksClient::new(http_client, MetadataApiConfig::default());
//! if let Some(metadata) = client.lookup("Dune").await? {
//!     apply_metadata(&mut form, &metadata);
//! }
//! ```

use crate::error::{MetadataError, Result};
use crate::providers::{BookMetadata, BookMetadataProvider};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::config::{CatalogConfig, MetadataApiConfig};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    published_date: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

/// Google Books volumes client
pub struct GoogleBooksClient {
    http_client: Arc<dyn HttpClient>,
    config: MetadataApiConfig,
}

impl GoogleBooksClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: MetadataApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Build a client from catalog configuration
    ///
    /// # Errors
    /// `MetadataError::NotConfigured` when the configuration carries no HTTP
    /// client.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let http_client = config.http_client.clone().ok_or_else(|| {
            MetadataError::NotConfigured("no HTTP client available".to_string())
        })?;

        Ok(Self::new(http_client, config.metadata_api_config.clone()))
    }

    fn search_url(&self, title: &str) -> String {
        let mut url = format!(
            "{}?q=intitle:{}&maxResults=1",
            self.config.google_books_url,
            urlencoding::encode(title)
        );

        if let Some(key) = &self.config.google_books_api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }

        url
    }

    fn into_metadata(info: VolumeInfo) -> BookMetadata {
        BookMetadata {
            title: non_empty(info.title),
            author: non_empty(info.authors.into_iter().next()),
            description: non_empty(info.description),
            year: info.published_date.as_deref().and_then(leading_year),
            category: non_empty(info.categories.into_iter().next()),
            thumbnail: non_empty(info.image_links.and_then(|links| links.thumbnail))
                .map(|url| upgrade_to_https(&url)),
        }
    }
}

#[async_trait]
impl BookMetadataProvider for GoogleBooksClient {
    async fn lookup(&self, title: &str) -> Result<Option<BookMetadata>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let url = self.search_url(title);
        debug!("Searching Google Books: {}", url);

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(self.config.request_timeout_secs));

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "Google Books request failed");
            MetadataError::Network(format!("Google Books search failed: {}", e))
        })?;

        if !response.is_success() {
            return Err(MetadataError::Http {
                status: response.status,
                body: response.body_text(),
            });
        }

        let volumes: VolumesResponse = serde_json::from_slice(&response.body).map_err(|e| {
            MetadataError::JsonParse(format!("Failed to parse volumes: {}", e))
        })?;

        match volumes.items.into_iter().next() {
            Some(volume) => {
                info!("Found Google Books match for '{}'", title);
                Ok(Some(Self::into_metadata(volume.volume_info)))
            }
            None => {
                info!("No Google Books match for '{}'", title);
                Ok(None)
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `"1965-08-01"` and `"1965"` both give 1965
fn leading_year(published: &str) -> Option<i32> {
    let year = published.trim().get(..4)?;
    if year.bytes().all(|b| b.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}

fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}
