//! Reqwest-backed [`HttpClient`] for metadata lookups

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("book-catalog/", env!("CARGO_PKG_VERSION"));

/// 429 and 5xx answers are worth another attempt
fn is_transient(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Sends lookup requests over rustls and repeats transient failures
///
/// Timeouts, refused connections, 429 and 5xx answers are retried according
/// to the configured [`RetryPolicy`]. When attempts run out the last
/// response is returned as is, so callers still see the real status.
pub struct ReqwestHttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl ReqwestHttpClient {
    /// Client with a 30 second request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match request.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn read_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to read body: {}", e)))?;
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(attempt, url = %request.url, "Sending lookup request");

            let reason = match self.build_request(&request).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !is_transient(status) || attempt >= attempts {
                        return Self::read_response(response).await;
                    }
                    format!("HTTP {}", status)
                }
                Err(e) if attempt < attempts && (e.is_timeout() || e.is_connect()) => e.to_string(),
                Err(e) => {
                    return Err(BridgeError::OperationFailed(format!(
                        "Request to {} failed: {}",
                        request.url, e
                    )));
                }
            };

            let delay = self.retry.delay_after(attempt);
            warn!(
                attempt,
                reason = %reason,
                delay_ms = delay.as_millis() as u64,
                "Retrying lookup request"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}
