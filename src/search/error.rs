//! Error types for book search.
//!
//! Every variant carries enough context for logs; the inline message shown
//! in the results view comes from [`SearchError::user_message`].

use thiserror::Error;

/// Inline message shown when the search service returns no matches.
pub const NO_BOOKS_FOUND: &str = "No books found";

/// Inline message shown for any transport, status, or parse failure.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong!";

/// Errors that can occur while searching for books.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The service answered but had no matching records.
    #[error("no books found for '{query}'\n  Suggestion: Try a shorter or differently spelled title")]
    NoResults {
        /// The title query that matched nothing
        query: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("request to search service failed: {message}\n  Suggestion: Check your network connection")]
    Request {
        /// Transport error text
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("search service returned HTTP {status}\n  Suggestion: {suggestion}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response body was not the expected `{ docs: [...] }` shape.
    #[error("unexpected search response format: {message}\n  Suggestion: The search service may have changed its API")]
    Parse {
        /// Decoder error text
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {message}\n  Suggestion: Check proxy environment variables")]
    Client {
        /// Builder error text
        message: String,
    },
}

impl SearchError {
    /// Creates a `NoResults` error.
    #[must_use]
    pub fn no_results(query: &str) -> Self {
        Self::NoResults {
            query: query.to_string(),
        }
    }

    /// Creates a `Request` error from a transport failure.
    #[must_use]
    pub fn request(error: &reqwest::Error) -> Self {
        Self::Request {
            message: error.to_string(),
        }
    }

    /// Creates an `HttpStatus` error with a status-specific suggestion.
    #[must_use]
    pub fn http_status(status: u16) -> Self {
        let suggestion = match status {
            429 => "Rate limit exceeded. Try again in a few seconds.",
            s if s >= 500 => "Search service unavailable. Try again later.",
            _ => "Check the configured API base URL",
        };
        Self::HttpStatus {
            status,
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a `Client` error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// True when the search succeeded but matched nothing.
    #[must_use]
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults { .. })
    }

    /// The short message displayed inline in the results view.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        if self.is_no_results() {
            NO_BOOKS_FOUND
        } else {
            SOMETHING_WENT_WRONG
        }
    }
}
