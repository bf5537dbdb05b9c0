//! Application state and its pure update functions.
//!
//! Nothing here performs I/O. The controller calls these functions and then
//! talks to the network, storage, and share boundaries.

use tracing::debug;

use crate::book::Book;
use crate::favorites::{FavoriteChange, Favorites};
use crate::search::SearchError;

/// Which view is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Search,
    Results,
}

/// Identifies one search request so its response can be matched to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything the views render from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub query: String,
    pub books: Vec<Book>,
    pub favorites: Favorites,
    pub loading: bool,
    pub error: Option<String>,
    pub page: Page,
    generation: u64,
}

impl AppState {
    /// Fresh state with previously stored favorites.
    #[must_use]
    pub fn with_favorites(favorites: Favorites) -> Self {
        Self {
            favorites,
            ..Self::default()
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Starts a search for the current query.
    ///
    /// Returns `None` and leaves the state untouched when the query is empty.
    /// Otherwise sets `loading`, clears the error, and returns the ticket the
    /// response must be applied with.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        if self.query.is_empty() {
            return None;
        }
        self.generation += 1;
        self.loading = true;
        self.error = None;
        Some(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Applies a search response.
    ///
    /// A response for anything but the most recent ticket is discarded and
    /// `false` is returned. Otherwise the page switches to results and
    /// `loading` is cleared whatever the outcome. Zero matches clear the
    /// result list; other failures leave the previous results in place.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Book>, SearchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                query = %ticket.query,
                stale = ticket.generation,
                latest = self.generation,
                "Discarding stale search response"
            );
            return false;
        }

        match result {
            Ok(books) => self.books = books,
            Err(error) => {
                if error.is_no_results() {
                    self.books.clear();
                }
                self.error = Some(error.user_message().to_string());
            }
        }
        self.page = Page::Results;
        self.loading = false;
        true
    }

    /// Returns to the search view. Results and favorites are kept.
    pub fn back_to_search(&mut self) {
        self.page = Page::Search;
    }

    pub fn toggle_favorite(&mut self, book: &Book) -> FavoriteChange {
        self.favorites.toggle(book)
    }

    #[must_use]
    pub fn is_favorite(&self, book: &Book) -> bool {
        self.favorites.is_favorite(book)
    }
}
