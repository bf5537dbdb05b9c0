//! Text rendering of the search and results views.
//!
//! Rendering is a pure function of [`AppState`] and the terminal width, so
//! the interactive session and the one-shot commands print the same cards.

use crate::app::{AppState, Page};
use crate::book::{Book, UNKNOWN, UNKNOWN_AUTHOR};

pub const APP_TITLE: &str = "📚 Book Finder";
pub const APP_SUBTITLE: &str = "Discover books you love";
pub const RESULTS_TITLE: &str = "📚 Search Results";
pub const BACK_HINT: &str = "← Back to Search";
pub const LOADING: &str = "Loading...";
pub const NO_IMAGE: &str = "[No Image]";
pub const FAVORITE_ON: &str = "★";
pub const FAVORITE_OFF: &str = "☆";

const CARD_INDENT: &str = "    ";

/// Renders the view selected by `state.page`.
#[must_use]
pub fn render(state: &AppState, width: usize) -> Vec<String> {
    match state.page {
        Page::Search => render_search_view(state, width),
        Page::Results => render_results_view(state, width),
    }
}

/// Title, subtitle, the current query, and the input hint.
#[must_use]
pub fn render_search_view(state: &AppState, width: usize) -> Vec<String> {
    let query = if state.query.is_empty() {
        "Search for books...".to_string()
    } else {
        state.query.clone()
    };
    [
        APP_TITLE.to_string(),
        APP_SUBTITLE.to_string(),
        String::new(),
        format!("Search: {query}"),
        "Type a title and press Enter to search.".to_string(),
    ]
    .iter()
    .map(|line| truncate_to_width(line, width))
    .collect()
}

/// Header, status lines, the favorites section, then the result cards.
#[must_use]
pub fn render_results_view(state: &AppState, width: usize) -> Vec<String> {
    let mut lines = vec![
        RESULTS_TITLE.to_string(),
        format!("[b] {BACK_HINT}"),
        String::new(),
    ];

    if state.loading {
        lines.push(LOADING.to_string());
    }
    if let Some(error) = &state.error {
        lines.push(error.clone());
    }

    if !state.favorites.is_empty() {
        lines.push(format!("⭐ Favorites ({})", state.favorites.len()));
        for (index, book) in state.favorites.iter().enumerate() {
            lines.extend(favorite_card(&format!("F{}", index + 1), book, state));
        }
        lines.push(String::new());
    }

    for (index, book) in state.books.iter().enumerate() {
        lines.extend(result_card(&(index + 1).to_string(), book, state));
    }

    lines
        .iter()
        .map(|line| truncate_to_width(line, width))
        .collect()
}

fn favorite_card(label: &str, book: &Book, state: &AppState) -> Vec<String> {
    vec![
        format!("[{label}] {}", book.title),
        cover_line(book),
        format!("{CARD_INDENT}{}", book.authors_or(UNKNOWN_AUTHOR)),
        controls_line(book, state),
    ]
}

fn result_card(label: &str, book: &Book, state: &AppState) -> Vec<String> {
    let mut lines = vec![
        format!("[{label}] {}", book.title),
        cover_line(book),
        format!("{CARD_INDENT}Author: {}", book.authors_or(UNKNOWN)),
        format!("{CARD_INDENT}Published: {}", book.published_display()),
    ];
    if let Some(subjects) = book.subjects_preview() {
        lines.push(format!("{CARD_INDENT}Subjects: {}", subjects.join(", ")));
    }
    lines.push(controls_line(book, state));
    lines
}

fn cover_line(book: &Book) -> String {
    let cover = book.cover_url().unwrap_or_else(|| NO_IMAGE.to_string());
    format!("{CARD_INDENT}Cover: {cover}")
}

fn controls_line(book: &Book, state: &AppState) -> String {
    let glyph = if state.is_favorite(book) {
        FAVORITE_ON
    } else {
        FAVORITE_OFF
    };
    format!("{CARD_INDENT}{glyph}  Share")
}

/// Truncates text to at most `width` chars, appending an ellipsis if truncated.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}
