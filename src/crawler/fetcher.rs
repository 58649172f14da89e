//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the scraper:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests following redirects
//! - Error classification
//!
//! Failures never escape this module as errors. `fetch_document` returns
//! `None` and logs the reason; that is the only failure signal callers see.

use crate::config::FetcherConfig;
use reqwest::{redirect::Policy, Client};
use scraper::Html;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body decode, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration (user agent, timeout)
///
/// # Example
///
/// ```no_run
/// use listing_harvest::config::FetcherConfig;
/// use listing_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx with readable body | `Success` |
/// | Any other HTTP status | `HttpError` |
/// | Timeout, connection, redirect or body error | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else if e.is_redirect() {
                format!("Too many redirects (limit {})", MAX_REDIRECTS)
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// Fetches a URL and parses it as an HTML document
///
/// Returns `None` on any transport or HTTP failure. The failure is logged
/// and never propagated.
pub async fn fetch_document(client: &Client, url: &str) -> Option<Html> {
    match fetch_url(client, url).await {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            tracing::debug!(
                "Fetched {} (status {}, {} bytes)",
                final_url,
                status_code,
                body.len()
            );
            Some(Html::parse_document(&body))
        }
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Failed to fetch {}: HTTP {}", url, status_code);
            None
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Failed to fetch {}: {}", url, error);
            None
        }
    }
}
