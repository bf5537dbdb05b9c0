//! Bookfinder Core Library
//!
//! Title search against Open Library with a locally persisted favorites list
//! and best-effort sharing.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`book`] - Book record and display helpers
//! - [`search`] - HTTP search client behind the [`BookSearch`] trait
//! - [`favorites`] - Favorites list and key-value persistence
//! - [`share`] - Share payloads and share targets
//! - [`app`] - Session state and the [`BookFinder`] controller
//! - [`view`] - Text rendering of the search and results views

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod book;
pub mod favorites;
pub mod search;
pub mod share;
pub mod view;

mod user_agent;

// Re-export commonly used types
pub use app::{AppState, BookFinder, Page};
pub use book::{Book, DEFAULT_SITE_URL};
pub use favorites::{
    FAVORITES_KEY, FavoriteChange, Favorites, FileStorage, KeyValueStorage, MemoryStorage,
    StorageError, load_favorites, save_favorites,
};
pub use search::{BookSearch, HttpTimeouts, SEARCH_RESULT_LIMIT, SearchClient, SearchError};
pub use share::{
    CommandShareTarget, SHARE_UNSUPPORTED_MESSAGE, ShareDispatch, SharePayload, ShareTarget,
    UnsupportedShareTarget,
};
