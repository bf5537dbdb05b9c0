//! Title search against the Open Library search API.
//!
//! # Architecture
//!
//! - [`BookSearch`] - Async trait the view controller searches through
//! - [`SearchClient`] - HTTP implementation (`GET /search.json?title=...`)
//! - [`SearchError`] - Failure taxonomy with inline user messages
//!
//! # Example
//!
//! ```no_run
//! use bookfinder_core::search::{BookSearch, SearchClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SearchClient::new()?;
//! let books = client.search_books("dune").await?;
//! for book in &books {
//!     println!("{}", book.title);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod http_client;

pub use client::{DEFAULT_API_BASE_URL, SEARCH_RESULT_LIMIT, SearchClient, build_search_url};
pub use error::{NO_BOOKS_FOUND, SOMETHING_WENT_WRONG, SearchError};
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, HttpTimeouts,
    build_search_http_client,
};

use async_trait::async_trait;

use crate::book::Book;

/// A source of title search results.
///
/// Implementations return at most [`SEARCH_RESULT_LIMIT`] books in the order
/// the service returned them, or [`SearchError::NoResults`] when nothing matched.
#[async_trait]
pub trait BookSearch: Send + Sync {
    /// Returns the name of this search source (for logging).
    fn name(&self) -> &str;

    /// Searches books by title.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when nothing matched or the request failed.
    async fn search_books(&self, query: &str) -> Result<Vec<Book>, SearchError>;
}
