//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::sources::{FetchError, Fetcher};

/// A fetcher that returns a predefined response without touching the network.
///
/// A fetcher built with [`MockFetcher::gated`] holds every request until
/// [`MockFetcher::release`] is called, which lets tests observe a load while
/// it is still in flight.
#[derive(Debug, Default)]
pub struct MockFetcher {
    response: Mutex<Option<Result<String, FetchError>>>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
    completed: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl MockFetcher {
    /// Create a mock that answers with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every request with `body`.
    pub fn with_body(body: impl Into<String>) -> Self {
        let fetcher = Self::new();
        fetcher.set_body(body);
        fetcher
    }

    /// Create a mock that fails every request with `error`.
    pub fn with_error(error: FetchError) -> Self {
        let fetcher = Self::new();
        fetcher.set_error(error);
        fetcher
    }

    /// Hold each request until [`MockFetcher::release`] is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let one held request (or the next one to arrive) complete.
    ///
    /// Releases accumulate, so calling this twice lets two requests through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Set the body to return.
    pub fn set_body(&self, body: impl Into<String>) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(Ok(body.into()));
    }

    /// Set the error to return.
    pub fn set_error(&self, error: FetchError) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(Err(error));
    }

    /// Number of requests started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of requests that returned
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// URL of the most recent request
    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_raw(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let response = self.response.lock().unwrap().clone();
        self.completed.fetch_add(1, Ordering::SeqCst);

        match response {
            Some(result) => result,
            None => Ok(String::new()),
        }
    }
}

/// Helper to build a volumes response body with one complete item per title.
pub fn volumes_body(titles: &[&str]) -> String {
    let items: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            serde_json::json!({
                "volumeInfo": {
                    "title": title,
                    "authors": [format!("Author {}", i + 1)],
                    "publishedDate": "2016",
                    "imageLinks": { "thumbnail": format!("http://books.google.com/{}.jpg", i + 1) }
                },
                "searchInfo": { "textSnippet": format!("Snippet {}", i + 1) }
            })
        })
        .collect();

    serde_json::json!({ "kind": "books#volumes", "totalItems": items.len(), "items": items })
        .to_string()
}
