//! Open Library search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::book::Book;
use crate::user_agent;

use super::http_client::{HttpTimeouts, build_search_http_client};
use super::{BookSearch, SearchError};

/// Default Open Library API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://openlibrary.org";

/// Maximum number of results kept from a single search.
pub const SEARCH_RESULT_LIMIT: usize = 12;

/// Top-level search response. Only `docs` is read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    docs: Vec<Book>,
}

/// Builds the search URL for a title query.
///
/// The query is percent-encoded so `&`, `#`, and spaces cannot break out of
/// the `title` parameter.
#[must_use]
pub fn build_search_url(base_url: &str, query: &str) -> String {
    format!(
        "{}/search.json?title={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(query)
    )
}

/// Searches Open Library by title over HTTP.
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    /// Creates a client for the public Open Library API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if HTTP client construction fails.
    pub fn new() -> Result<Self, SearchError> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Creates a client with a custom base URL (config override, wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_timeouts(base_url, HttpTimeouts::default())
    }

    /// Creates a client with a custom base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if HTTP client construction fails.
    #[tracing::instrument(skip_all, fields(base_url))]
    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> Result<Self, SearchError> {
        let base_url = base_url.into();
        tracing::Span::current().record("base_url", base_url.as_str());
        let client = build_search_http_client(&user_agent::default_user_agent(), timeouts)?;
        Ok(Self { client, base_url })
    }

    /// The base URL this client sends requests to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BookSearch for SearchClient {
    fn name(&self) -> &'static str {
        "openlibrary"
    }

    #[tracing::instrument(skip(self), fields(source = "openlibrary"))]
    async fn search_books(&self, query: &str) -> Result<Vec<Book>, SearchError> {
        let url = build_search_url(&self.base_url, query);
        debug!(api_url = %url, "Calling search API");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Search API request failed");
            SearchError::request(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Search API error status");
            return Err(SearchError::http_status(status.as_u16()));
        }

        let body = response.json::<SearchResponse>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse search response JSON");
            SearchError::parse(e.to_string())
        })?;

        limit_results(query, body.docs)
    }
}

/// Applies the zero-match and result-limit rules to a decoded `docs` list.
fn limit_results(query: &str, mut docs: Vec<Book>) -> Result<Vec<Book>, SearchError> {
    if docs.is_empty() {
        debug!("Search returned no documents");
        return Err(SearchError::no_results(query));
    }
    let upstream = docs.len();
    docs.truncate(SEARCH_RESULT_LIMIT);
    debug!(upstream, kept = docs.len(), "Search returned documents");
    Ok(docs)
}
