//! The view controller: owns [`AppState`] and wires it to search, storage,
//! and sharing.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use super::state::{AppState, Page};
use crate::book::Book;
use crate::favorites::{
    FavoriteChange, KeyValueStorage, StorageError, load_favorites, save_favorites,
};
use crate::search::BookSearch;
use crate::share::{ShareDispatch, ShareTarget, share_book};

/// Drives one book-finder session.
///
/// Favorites are read from storage once in [`BookFinder::new`] and written
/// back in full after every change.
pub struct BookFinder {
    state: AppState,
    search: Arc<dyn BookSearch>,
    storage: Box<dyn KeyValueStorage>,
    share: Arc<dyn ShareTarget>,
    site_url: Url,
}

impl BookFinder {
    /// Creates a controller and loads stored favorites.
    #[must_use]
    pub fn new(
        search: Arc<dyn BookSearch>,
        storage: Box<dyn KeyValueStorage>,
        share: Arc<dyn ShareTarget>,
        site_url: Url,
    ) -> Self {
        let favorites = load_favorites(&*storage);
        info!(
            favorites = favorites.len(),
            search = search.name(),
            "Book finder ready"
        );
        Self {
            state: AppState::with_favorites(favorites),
            search,
            storage,
            share,
            site_url,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.state.page
    }

    #[must_use]
    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
    }

    /// Runs a search for the current query and applies the outcome.
    ///
    /// Does nothing for an empty query. Failures end up in `state().error`;
    /// this never returns an error.
    ///
    /// The exclusive borrow is held across the request, so searches through
    /// one controller never overlap and the ticket always matches. Discarding
    /// stale responses only comes into play when [`AppState::begin_search`]
    /// and [`AppState::finish_search`] are driven directly.
    #[tracing::instrument(skip(self), fields(query = %self.state.query))]
    pub async fn search(&mut self) {
        let Some(ticket) = self.state.begin_search() else {
            debug!("Ignoring empty query");
            return;
        };

        let search = Arc::clone(&self.search);
        let result = search.search_books(ticket.query()).await;
        match &result {
            Ok(books) => info!(results = books.len(), "Search complete"),
            Err(error) if error.is_no_results() => info!("Search matched nothing"),
            Err(error) => warn!(error = %error, "Search failed"),
        }
        self.state.finish_search(&ticket, result);
    }

    pub fn back_to_search(&mut self) {
        self.state.back_to_search();
    }

    #[must_use]
    pub fn is_favorite(&self, book: &Book) -> bool {
        self.state.is_favorite(book)
    }

    /// Adds or removes a favorite and persists the full list.
    ///
    /// The in-memory change is kept even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the favorites could not be written.
    pub fn toggle_favorite(&mut self, book: &Book) -> Result<FavoriteChange, StorageError> {
        let change = self.state.toggle_favorite(book);
        debug!(key = %book.key, ?change, "Toggled favorite");
        self.persist_favorites()?;
        Ok(change)
    }

    /// Removes a favorite by key and persists. Returns the removed book.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the favorites could not be written.
    pub fn remove_favorite(&mut self, key: &str) -> Result<Option<Book>, StorageError> {
        let removed = self.state.favorites.remove(key);
        if removed.is_some() {
            self.persist_favorites()?;
        }
        Ok(removed)
    }

    /// Removes all favorites and persists. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the favorites could not be written.
    pub fn clear_favorites(&mut self) -> Result<usize, StorageError> {
        let count = self.state.favorites.len();
        self.state.favorites.clear();
        self.persist_favorites()?;
        Ok(count)
    }

    /// Shares a book; the share runs detached and its outcome is only logged.
    #[must_use]
    pub fn share(&self, book: &Book) -> ShareDispatch {
        share_book(&self.share, book, &self.site_url)
    }

    fn persist_favorites(&self) -> Result<(), StorageError> {
        save_favorites(&*self.storage, &self.state.favorites).inspect_err(|error| {
            warn!(error = %error, "Failed to persist favorites");
        })
    }
}

impl std::fmt::Debug for BookFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookFinder")
            .field("state", &self.state)
            .field("search", &self.search.name())
            .field("site_url", &self.site_url.as_str())
            .finish_non_exhaustive()
    }
}
