//! Fetching and decoding of search responses.
//!
//! This module defines the [`Fetcher`] trait used by the loader to retrieve raw
//! response text, and the Google Books response parser.
//!
//! Neither side lets a failure escape. A fetch that fails for any reason
//! yields an empty string, and [`parse_books`] maps empty input to `None`
//! and undecodable input to an empty list. The typed errors below exist so
//! the failure can be reported through `tracing` before it is degraded.

mod google_books;
pub mod mock;

pub use google_books::{parse_books, try_parse_books};
pub use mock::MockFetcher;

use async_trait::async_trait;

/// Retrieves the raw body of a search response.
///
/// Implementors only have to provide [`Fetcher::fetch_raw`]; the provided
/// [`Fetcher::fetch`] turns every error into an empty string and logs it.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Perform one GET against `url`, returning the body of a 200 response
    async fn fetch_raw(&self, url: &str) -> Result<String, FetchError>;

    /// Perform one GET, returning the body or an empty string on any failure
    async fn fetch(&self, url: Option<&str>) -> String {
        let Some(url) = url else {
            tracing::error!("Problem building the URL: no URL given");
            return String::new();
        };

        match self.fetch_raw(url).await {
            Ok(body) => body,
            Err(FetchError::Status(code)) => {
                tracing::error!(url, "Error response code: {}", code);
                String::new()
            }
            Err(e) => {
                tracing::error!(url, error = %e, "Problem retrieving the JSON results");
                String::new()
            }
        }
    }
}

/// Errors that can occur while fetching a response
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, timeout or other transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a status other than 200
    #[error("Unexpected status code: {0}")]
    Status(u16),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

/// Errors that can occur while decoding a response
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The text is not valid JSON or does not have the expected shape
    #[error("JSON: {0}")]
    Json(String),

    /// The top-level `items` array is missing
    #[error("Response has no items array")]
    MissingItems,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_without_url_is_empty() {
        let fetcher = MockFetcher::with_body("{}");
        assert_eq!(fetcher.fetch(None).await, "");
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_degrades_errors_to_empty() {
        let fetcher = MockFetcher::with_error(FetchError::Status(404));
        assert_eq!(fetcher.fetch(Some("http://example.com")).await, "");

        let fetcher = MockFetcher::with_error(FetchError::Network("refused".to_string()));
        assert_eq!(fetcher.fetch(Some("http://example.com")).await, "");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::Status(503).to_string(),
            "Unexpected status code: 503"
        );
        assert_eq!(
            ParseError::MissingItems.to_string(),
            "Response has no items array"
        );
    }
}
