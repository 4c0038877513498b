//! Terminal rendering of search results.
//!
//! [`ConsoleDisplay`] is the consumer side of a [`Loader`](crate::loader::Loader):
//! it renders delivered listings, shows an empty-state message when there is
//! nothing to list, and forgets what it showed when the loader is reset.

use comfy_table::{presets, Attribute, Cell, Table};
use std::io::{self, Write};

use crate::loader::{Books, LoaderCallbacks};
use crate::models::BookListing;

/// Maximum title width in table output
const TITLE_WIDTH: usize = 50;

/// Maximum authors width in table output
const AUTHORS_WIDTH: usize = 30;

/// Message shown in place of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// No network connection was available, so no search was made
    NoConnection,
    /// The search finished without listings, or could not be completed
    NoBooks,
}

impl EmptyState {
    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoConnection => "No internet connection.",
            EmptyState::NoBooks => "No books found.",
        }
    }
}

impl std::fmt::Display for EmptyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Table with title, authors and year
    Table,
    /// Pretty-printed JSON array
    Json,
    /// One block of text per book
    Plain,
}

/// Renders loader results to a writer.
#[derive(Debug)]
pub struct ConsoleDisplay<W: Write> {
    out: W,
    format: DisplayFormat,
    shown: Option<Books>,
    empty_state: Option<EmptyState>,
}

impl ConsoleDisplay<io::Stdout> {
    /// Display writing to standard output
    pub fn stdout(format: DisplayFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    /// Display writing to `out`
    pub fn new(out: W, format: DisplayFormat) -> Self {
        Self {
            out,
            format,
            shown: None,
            empty_state: None,
        }
    }

    /// Listings currently shown
    pub fn shown(&self) -> &[BookListing] {
        self.shown.as_deref().unwrap_or(&[])
    }

    /// Empty-state message currently shown, if any
    pub fn empty_state(&self) -> Option<EmptyState> {
        self.empty_state
    }

    /// Get the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the display, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Clear the listings and show `state` instead.
    pub fn show_empty_state(&mut self, state: EmptyState) {
        self.shown = None;
        self.empty_state = Some(state);
        if let Err(e) = writeln!(self.out, "{}", state) {
            tracing::warn!(error = %e, "Failed to write output");
        }
    }

    fn show_books(&mut self, books: Books) {
        let rendered = match self.format {
            DisplayFormat::Json => render_json(&books),
            DisplayFormat::Plain => render_plain(&books),
            DisplayFormat::Table => render_table(&books),
        };

        self.empty_state = None;
        self.shown = Some(books);

        if let Err(e) = writeln!(self.out, "{}", rendered) {
            tracing::warn!(error = %e, "Failed to write output");
        }
    }
}

impl<W: Write> LoaderCallbacks for ConsoleDisplay<W> {
    fn on_load_finished(&mut self, books: Option<Books>) {
        // Previous results never carry over into a new delivery.
        self.shown = None;

        match books {
            Some(books) if !books.is_empty() => self.show_books(books),
            _ => self.show_empty_state(EmptyState::NoBooks),
        }
    }

    fn on_loader_reset(&mut self) {
        self.shown = None;
        self.empty_state = None;
    }
}

fn render_json(books: &[BookListing]) -> String {
    serde_json::to_string_pretty(books).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize listings");
        "[]".to_string()
    })
}

fn render_plain(books: &[BookListing]) -> String {
    let mut out = String::new();
    for book in books {
        out.push_str(&format!(
            "{} - {} ({})\n",
            book.title(),
            book.authors(),
            book.published_date()
        ));
        if book.has_thumbnail() {
            out.push_str(&format!("  Thumbnail: {}\n", book.thumbnail()));
        }
        out.push_str(&format!("  {}\n\n", book.text_snippet()));
    }
    out.trim_end().to_string()
}

fn render_table(books: &[BookListing]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["#", "Title", "Authors", "Year"]);

    for (i, book) in books.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(truncate_with_ellipsis(book.title(), TITLE_WIDTH))
                .add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(book.authors(), AUTHORS_WIDTH)),
            Cell::new(book.published_year().unwrap_or("-")),
        ]);
    }

    table.to_string()
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
///
/// Returns a string that fits within `max_width` columns, appending an
/// ellipsis if truncation occurred.
///
/// # Examples
///
/// ```
/// use book_listing::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    // Leave room for the three-column ellipsis.
    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();
    for (c, w) in char_widths {
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookListingBuilder;

    fn sample_books() -> Books {
        Books::from(vec![
            BookListingBuilder::new()
                .title("Android Programming")
                .authors("Bill Phillips, Brian Hardy")
                .published_date("2013-04-07")
                .thumbnail("http://books.google.com/1.jpg")
                .text_snippet("The Big Nerd Ranch Guide")
                .build(),
            BookListingBuilder::new().title("Untitled Drafts").build(),
        ])
    }

    fn output(display: ConsoleDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_state_messages() {
        assert_eq!(EmptyState::NoConnection.message(), "No internet connection.");
        assert_eq!(EmptyState::NoBooks.to_string(), "No books found.");
    }

    #[test]
    fn test_absent_result_shows_no_books() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Plain);
        display.on_load_finished(None);

        assert_eq!(display.empty_state(), Some(EmptyState::NoBooks));
        assert!(display.shown().is_empty());
        assert_eq!(output(display), "No books found.\n");
    }

    #[test]
    fn test_empty_result_shows_no_books() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Table);
        display.on_load_finished(Some(Books::from(Vec::new())));

        assert_eq!(display.empty_state(), Some(EmptyState::NoBooks));
        assert_eq!(output(display), "No books found.\n");
    }

    #[test]
    fn test_plain_output() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Plain);
        display.on_load_finished(Some(sample_books()));

        assert_eq!(display.shown().len(), 2);
        assert_eq!(display.empty_state(), None);

        let text = output(display);
        assert!(text.contains("Android Programming - Bill Phillips, Brian Hardy (2013-04-07)"));
        assert!(text.contains("Thumbnail: http://books.google.com/1.jpg"));
        assert!(text.contains("Untitled Drafts - No Author! (No Published Date!)"));
        assert!(!text.contains("No Thumbnail!"));
    }

    #[test]
    fn test_json_output() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Json);
        display.on_load_finished(Some(sample_books()));

        let parsed: Vec<BookListing> = serde_json::from_str(&output(display)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title(), "Android Programming");
    }

    #[test]
    fn test_table_output() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Table);
        display.on_load_finished(Some(sample_books()));

        let text = output(display);
        assert!(text.contains("Title"));
        assert!(text.contains("Android Programming"));
        assert!(text.contains("2013"));
    }

    #[test]
    fn test_reset_clears_shown_books() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Plain);
        display.on_load_finished(Some(sample_books()));
        display.on_loader_reset();

        assert!(display.shown().is_empty());
        assert_eq!(display.empty_state(), None);
    }

    #[test]
    fn test_no_connection_state() {
        let mut display = ConsoleDisplay::new(Vec::new(), DisplayFormat::Table);
        display.show_empty_state(EmptyState::NoConnection);

        assert_eq!(display.empty_state(), Some(EmptyState::NoConnection));
        assert_eq!(output(display), "No internet connection.\n");
    }

    #[test]
    fn test_truncate_with_ellipsis_basic() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_with_ellipsis_empty() {
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 0), "");
        assert_eq!(truncate_with_ellipsis("Hello", 1), "...");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character takes two columns.
        assert_eq!(truncate_with_ellipsis("日本語の本", 7), "日本...");
    }
}
