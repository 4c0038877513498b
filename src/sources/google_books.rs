//! Google Books volumes response parser.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{BookListing, BookListingBuilder};
use crate::sources::ParseError;

/// Decode a raw volumes response into book listings.
///
/// Returns `None` when there is no response text at all, so callers can tell
/// "nothing was fetched" apart from "the search matched nothing". Text that is
/// present but cannot be decoded yields an empty list.
///
/// Items are decoded independently: an item that does not have the expected
/// shape is logged and skipped, and the remaining items are still returned in
/// their original order.
pub fn parse_books(raw: Option<&str>) -> Option<Vec<BookListing>> {
    let raw = raw.filter(|text| !text.is_empty())?;

    match try_parse_books(raw) {
        Ok(books) => Some(books),
        Err(e) => {
            tracing::warn!(error = %e, "Problem parsing the JSON results");
            Some(Vec::new())
        }
    }
}

/// Decode a raw volumes response, reporting a top-level failure as an error.
///
/// Malformed individual items are skipped rather than failing the batch.
pub fn try_parse_books(raw: &str) -> Result<Vec<BookListing>, ParseError> {
    let root: Value = serde_json::from_str(raw)?;

    let items = root.get("items").ok_or(ParseError::MissingItems)?;
    let items = items
        .as_array()
        .ok_or_else(|| ParseError::Json("items is not an array".to_string()))?;

    let mut books = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match GBItem::deserialize(item) {
            Ok(item) => books.push(item.into_listing()),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed volume");
            }
        }
    }

    Ok(books)
}

/// Treat blank strings the same as missing ones
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn text(value: Option<GBText>) -> Option<String> {
    present(value.map(|t| t.0))
}

// ===== Google Books API Types =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GBItem {
    volume_info: GBVolumeInfo,
    search_info: Option<GBSearchInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GBVolumeInfo {
    title: Option<GBText>,
    authors: Option<GBAuthors>,
    published_date: Option<GBText>,
    image_links: Option<GBImageLinks>,
}

/// A leaf value rendered as text; numbers and booleans are accepted as written
#[derive(Debug)]
struct GBText(String);

impl<'de> Deserialize<'de> for GBText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(GBText(s)),
            Value::Number(n) => Ok(GBText(n.to_string())),
            Value::Bool(b) => Ok(GBText(b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a text value, found {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GBAuthors {
    One(GBText),
    Many(Vec<GBText>),
}

impl GBAuthors {
    fn joined(self) -> String {
        match self {
            GBAuthors::One(name) => name.0.trim().to_string(),
            GBAuthors::Many(names) => names
                .iter()
                .map(|s| s.0.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GBImageLinks {
    thumbnail: Option<GBText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GBSearchInfo {
    text_snippet: Option<GBText>,
}

impl GBItem {
    fn into_listing(self) -> BookListing {
        let volume = self.volume_info;
        let mut builder = BookListingBuilder::new();

        if let Some(title) = text(volume.title) {
            builder = builder.title(title);
        }
        if let Some(authors) = present(volume.authors.map(GBAuthors::joined)) {
            builder = builder.authors(authors);
        }
        if let Some(date) = text(volume.published_date) {
            builder = builder.published_date(date);
        }
        // A missing imageLinks group counts the same as a missing thumbnail.
        if let Some(thumbnail) = text(volume.image_links.and_then(|links| links.thumbnail)) {
            builder = builder.thumbnail(thumbnail);
        }
        if let Some(snippet) = text(self.search_info.and_then(|info| info.text_snippet)) {
            builder = builder.text_snippet(snippet);
        }

        builder.build()
    }
}
