//! Search request model.

use serde::{Deserialize, Serialize};

/// Default Google Books volumes endpoint
pub const GOOGLE_BOOKS_VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Default number of results requested per search
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query as typed by the user
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Whether the query has any searchable text
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Build the request URL against `base_url`.
    ///
    /// Returns `None` for a blank query, which a loader turns into the
    /// "no data" result without touching the network.
    pub fn request_url(&self, base_url: &str) -> Option<String> {
        if self.is_blank() {
            return None;
        }

        Some(format!(
            "{}?maxResults={}&q={}",
            base_url.trim_end_matches('/'),
            self.max_results,
            urlencoding::encode(self.query.trim())
        ))
    }
}
