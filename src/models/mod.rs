//! Core data models for book listings and search requests.

mod book;
mod search;

pub use book::{
    BookListing, BookListingBuilder, NO_AUTHOR, NO_PUBLISHED_DATE, NO_TEXT_SNIPPET, NO_THUMBNAIL,
    NO_TITLE,
};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS, GOOGLE_BOOKS_VOLUMES_URL};
