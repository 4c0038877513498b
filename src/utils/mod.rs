//! Utility modules supporting the search pipeline.
//!
//! - [`HttpFetcher`]: reqwest-backed [`Fetcher`](crate::sources::Fetcher) with bounded timeouts
//! - [`Connectivity`]: reachability check consulted before a search starts
//! - [`ConsoleDisplay`]: terminal consumer of loader results
//!
//! # Fetching
//!
//! ```rust,no_run
//! use book_listing::sources::Fetcher;
//! use book_listing::utils::HttpFetcher;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new()?;
//! let body = fetcher
//!     .fetch(Some("https://www.googleapis.com/books/v1/volumes?q=rust"))
//!     .await;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

mod connectivity;
mod display;
mod http;

pub use connectivity::{Connectivity, StaticConnectivity, TcpConnectivity};
pub use display::{truncate_with_ellipsis, ConsoleDisplay, DisplayFormat, EmptyState};
pub use http::{HttpFetcher, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
