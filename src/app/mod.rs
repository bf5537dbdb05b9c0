//! Session state and the controller that drives it.
//!
//! - [`AppState`] - Query, results, favorites, loading flag, error, page
//! - [`BookFinder`] - Owns the state and the search, storage, and share boundaries

mod controller;
mod state;

pub use controller::BookFinder;
pub use state::{AppState, Page, SearchTicket};
