//! # Book Listing
//!
//! Searches the Google Books volumes API and turns the response into a list of
//! [`BookListing`] values.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (BookListing, SearchQuery)
//! - [`sources`]: The [`Fetcher`] trait and the volumes response parser
//! - [`loader`]: Background fetch-then-parse lifecycle with reset support
//! - [`utils`]: HTTP fetcher, connectivity probe and terminal display
//! - [`config`]: Configuration management

pub mod config;
pub mod loader;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use loader::{Books, Loader, LoaderCallbacks, LoaderState};
pub use models::{BookListing, SearchQuery};
pub use sources::{parse_books, Fetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
