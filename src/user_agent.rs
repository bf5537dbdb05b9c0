//! Shared User-Agent string for search service requests.
//!
//! Open Library asks API clients to identify themselves; keep the project URL
//! and version in one place.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/bookfinder";

/// Default User-Agent for search requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bookfinder/{version} (book-search-tool; +{PROJECT_UA_URL})")
}
