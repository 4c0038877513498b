//! Asynchronous fetch-and-parse lifecycle.
//!
//! A [`Loader`] runs one search at a time on a background Tokio task and hands
//! the outcome to its [`LoaderCallbacks`]. Results never reach the callbacks
//! from the background task directly: the owner awaits [`Loader::deliver`]
//! (or polls [`Loader::try_deliver`]) on its own task, which is where the
//! callbacks run. This keeps every delivery for one loader on a single task.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --start--> Loading --deliver--> Delivered --start--> Loading
//!   ^                |                     |
//!   +-----reset------+---------reset-------+
//! ```
//!
//! Calling [`Loader::reset`] while a load is in flight does not stop the task;
//! its result is discarded when it arrives. Dropping the loader has the same
//! effect.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use book_listing::loader::{Books, Loader, LoaderCallbacks};
//! use book_listing::utils::HttpFetcher;
//!
//! struct Print;
//!
//! impl LoaderCallbacks for Print {
//!     fn on_load_finished(&mut self, books: Option<Books>) {
//!         println!("{} books", books.map(|b| b.len()).unwrap_or(0));
//!     }
//!
//!     fn on_loader_reset(&mut self) {}
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut loader = Loader::new(Arc::new(HttpFetcher::new()?), Print);
//! loader.start(Some("https://www.googleapis.com/books/v1/volumes?q=android".to_string()));
//! loader.deliver().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::models::BookListing;
use crate::sources::{parse_books, Fetcher};

/// Immutable snapshot of the listings produced by one load
pub type Books = Arc<[BookListing]>;

/// Receives the outcome of a [`Loader`].
pub trait LoaderCallbacks {
    /// A load finished.
    ///
    /// `None` means no data could be obtained (no URL, or the fetch produced
    /// nothing). `Some` holds the listings in response order and may be empty.
    fn on_load_finished(&mut self, books: Option<Books>);

    /// The loader was reset; anything shown from a previous load should be cleared.
    fn on_loader_reset(&mut self);
}

/// Current lifecycle state of a [`Loader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Nothing started since creation or the last reset
    Idle,
    /// A load is in flight or its result has not been delivered yet
    Loading,
    /// The last load's result was handed to the callbacks
    Delivered,
}

#[derive(Debug)]
struct Completion {
    generation: u64,
    books: Option<Vec<BookListing>>,
}

/// Runs fetch-then-parse loads in the background and delivers their results.
pub struct Loader<C: LoaderCallbacks> {
    fetcher: Arc<dyn Fetcher>,
    callbacks: C,
    state: LoaderState,
    generation: u64,
    result: Option<Books>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<C: LoaderCallbacks> Loader<C> {
    /// Create a loader that fetches with `fetcher` and reports to `callbacks`.
    pub fn new(fetcher: Arc<dyn Fetcher>, callbacks: C) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            callbacks,
            state: LoaderState::Idle,
            generation: 0,
            result: None,
            tx,
            rx,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Listings from the last delivered load, if it produced any
    pub fn result(&self) -> Option<&Books> {
        self.result.as_ref()
    }

    /// The registered callbacks
    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    /// Start loading `url`.
    ///
    /// Returns `false` without doing anything if a load is already in flight.
    /// Without a URL the "no data" result is delivered immediately and no task
    /// is spawned. Otherwise the fetch and parse run on a new Tokio task, so
    /// this must be called from within a Tokio runtime.
    pub fn start(&mut self, url: Option<String>) -> bool {
        if self.state == LoaderState::Loading {
            tracing::debug!("Load already in flight, ignoring start");
            return false;
        }

        let Some(url) = url else {
            tracing::debug!("No URL to load");
            self.finish(None);
            return true;
        };

        self.generation += 1;
        self.state = LoaderState::Loading;

        let generation = self.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();

        tracing::debug!(generation, %url, "Starting load");

        tokio::spawn(async move {
            let work = tokio::spawn(async move {
                let raw = fetcher.fetch(Some(&url)).await;
                parse_books(Some(&raw))
            });

            // A worker that dies still has to complete the load.
            let books = match work.await {
                Ok(books) => books,
                Err(e) => {
                    tracing::error!(generation, error = %e, "Load task failed");
                    None
                }
            };

            // The receiver is gone once the loader is dropped.
            let _ = tx.send(Completion { generation, books });
        });

        true
    }

    /// Wait for the in-flight load and hand its result to the callbacks.
    ///
    /// Returns `false` immediately when nothing is loading. Results of loads
    /// that were reset are discarded while waiting.
    pub async fn deliver(&mut self) -> bool {
        while self.state == LoaderState::Loading {
            let Some(completion) = self.rx.recv().await else {
                return false;
            };
            if self.accept(completion) {
                return true;
            }
        }
        false
    }

    /// Deliver the in-flight load's result if it is already available.
    pub fn try_deliver(&mut self) -> bool {
        while self.state == LoaderState::Loading {
            let Ok(completion) = self.rx.try_recv() else {
                return false;
            };
            if self.accept(completion) {
                return true;
            }
        }
        false
    }

    /// Discard the current result and any in-flight load, returning to idle.
    pub fn reset(&mut self) {
        tracing::debug!(generation = self.generation, state = ?self.state, "Resetting loader");

        // Bumping the generation orphans whatever is still running.
        self.generation += 1;
        self.state = LoaderState::Idle;
        self.result = None;
        self.callbacks.on_loader_reset();
    }

    fn accept(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation {
            tracing::debug!(
                stale = completion.generation,
                current = self.generation,
                "Discarding result of a reset load"
            );
            return false;
        }

        self.finish(completion.books);
        true
    }

    fn finish(&mut self, books: Option<Vec<BookListing>>) {
        let books: Option<Books> = books.map(Books::from);
        tracing::debug!(
            count = books.as_ref().map(|b| b.len()),
            "Load finished"
        );

        self.result = books.clone();
        self.state = LoaderState::Delivered;
        self.callbacks.on_load_finished(books);
    }
}

impl<C: LoaderCallbacks> std::fmt::Debug for Loader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("fetcher", &self.fetcher)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("result", &self.result.as_ref().map(|b| b.len()))
            .finish()
    }
}
