//! Book listing model representing one volume from a search response.

use serde::{Deserialize, Serialize};

/// Placeholder used when a volume has no title.
pub const NO_TITLE: &str = "No Title!";

/// Placeholder used when a volume lists no authors.
pub const NO_AUTHOR: &str = "No Author!";

/// Placeholder used when a volume has no published date.
pub const NO_PUBLISHED_DATE: &str = "No Published Date!";

/// Placeholder used when a volume has no thumbnail link.
pub const NO_THUMBNAIL: &str = "No Thumbnail!";

/// Placeholder used when a search hit carries no text snippet.
pub const NO_TEXT_SNIPPET: &str = "No TextSnippet!";

/// A single book returned by a search.
///
/// Every field is always populated: values missing from the response are
/// replaced by the matching placeholder constant. A listing cannot be
/// changed once built; a new search produces new listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListing {
    title: String,
    authors: String,
    published_date: String,
    thumbnail: String,
    text_snippet: String,
}

impl BookListing {
    /// Book title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Authors, comma-separated when the volume has several
    pub fn authors(&self) -> &str {
        &self.authors
    }

    /// Published date as reported by the API (year, year-month or full date)
    pub fn published_date(&self) -> &str {
        &self.published_date
    }

    /// Thumbnail image URL
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    /// Search snippet, may contain HTML entities
    pub fn text_snippet(&self) -> &str {
        &self.text_snippet
    }

    /// Returns the author names as a vector
    pub fn author_list(&self) -> Vec<&str> {
        if self.authors == NO_AUTHOR {
            return Vec::new();
        }
        self.authors
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Four-digit year of publication, if the date starts with one
    pub fn published_year(&self) -> Option<&str> {
        let year = self.published_date.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }

    /// Whether the listing has a real thumbnail link
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail != NO_THUMBNAIL
    }
}

/// Builder for constructing [`BookListing`] values
///
/// Fields left unset fall back to their placeholder.
#[derive(Debug, Clone, Default)]
pub struct BookListingBuilder {
    title: Option<String>,
    authors: Option<String>,
    published_date: Option<String>,
    thumbnail: Option<String>,
    text_snippet: Option<String>,
}

impl BookListingBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    /// Set the published date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.published_date = Some(date.into());
        self
    }

    /// Set the thumbnail URL
    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    /// Set the text snippet
    pub fn text_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.text_snippet = Some(snippet.into());
        self
    }

    /// Build the listing
    pub fn build(self) -> BookListing {
        BookListing {
            title: self.title.unwrap_or_else(|| NO_TITLE.to_string()),
            authors: self.authors.unwrap_or_else(|| NO_AUTHOR.to_string()),
            published_date: self
                .published_date
                .unwrap_or_else(|| NO_PUBLISHED_DATE.to_string()),
            thumbnail: self.thumbnail.unwrap_or_else(|| NO_THUMBNAIL.to_string()),
            text_snippet: self
                .text_snippet
                .unwrap_or_else(|| NO_TEXT_SNIPPET.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_placeholders() {
        let book = BookListingBuilder::new().build();
        assert_eq!(book.title(), NO_TITLE);
        assert_eq!(book.authors(), NO_AUTHOR);
        assert_eq!(book.published_date(), NO_PUBLISHED_DATE);
        assert_eq!(book.thumbnail(), NO_THUMBNAIL);
        assert_eq!(book.text_snippet(), NO_TEXT_SNIPPET);
        assert!(!book.has_thumbnail());
    }

    #[test]
    fn test_builder_keeps_given_fields() {
        let book = BookListingBuilder::new()
            .title("Android Programming")
            .authors("Bill Phillips, Brian Hardy")
            .published_date("2013-04-07")
            .thumbnail("http://books.google.com/thumb.jpg")
            .build();

        assert_eq!(book.title(), "Android Programming");
        assert_eq!(book.author_list(), vec!["Bill Phillips", "Brian Hardy"]);
        assert_eq!(book.published_year(), Some("2013"));
        assert!(book.has_thumbnail());
        assert_eq!(book.text_snippet(), NO_TEXT_SNIPPET);
    }

    #[test]
    fn test_author_list_of_placeholder_is_empty() {
        let book = BookListingBuilder::new().build();
        assert!(book.author_list().is_empty());
    }

    #[test]
    fn test_published_year_rejects_placeholder() {
        let book = BookListingBuilder::new().build();
        assert_eq!(book.published_year(), None);

        let book = BookListingBuilder::new().published_date("19").build();
        assert_eq!(book.published_year(), None);
    }
}
