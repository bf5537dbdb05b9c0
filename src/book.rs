//! Book records as returned by the Open Library search API.
//!
//! A [`Book`] is immutable once received. Its `key` (e.g. `/works/OL1W`) is
//! the only identity used for equality checks in the favorites list.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default Open Library site URL, used to build per-book page links.
pub const DEFAULT_SITE_URL: &str = "https://openlibrary.org";

/// Base URL for cover images (`/b/id/<cover_i>-L.jpg`).
pub const COVERS_BASE_URL: &str = "https://covers.openlibrary.org";

/// Author fallback shown on favorites cards and in share text.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Author fallback shown on search result cards.
pub const UNKNOWN: &str = "Unknown";

/// Maximum number of subjects shown on a result card.
pub const SUBJECT_PREVIEW_LIMIT: usize = 3;

/// A bibliographic record from the search service.
///
/// Fields the API returns beyond these are ignored. Absent optional fields
/// are omitted when serialized so the stored favorites keep the upstream shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Work key, unique per record.
    pub key: String,
    /// Display title.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    /// Cover image identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
}

impl Book {
    /// Creates a book with only the required fields set.
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            author_name: None,
            first_publish_year: None,
            cover_i: None,
            subject: None,
        }
    }

    /// Joins author names with `", "`, or returns `fallback` when there are none.
    #[must_use]
    pub fn authors_or(&self, fallback: &str) -> String {
        match self.author_name.as_deref() {
            Some(names) if !names.is_empty() => names.join(", "),
            _ => fallback.to_string(),
        }
    }

    /// Publish year for display, `"N/A"` when unknown.
    #[must_use]
    pub fn published_display(&self) -> String {
        self.first_publish_year
            .map_or_else(|| "N/A".to_string(), |year| year.to_string())
    }

    /// The first few subjects, or `None` when the record carries no subject list.
    #[must_use]
    pub fn subjects_preview(&self) -> Option<&[String]> {
        self.subject
            .as_deref()
            .map(|subjects| &subjects[..subjects.len().min(SUBJECT_PREVIEW_LIMIT)])
    }

    /// Large cover image URL when a cover id is present.
    #[must_use]
    pub fn cover_url(&self) -> Option<String> {
        self.cover_i
            .map(|id| format!("{COVERS_BASE_URL}/b/id/{id}-L.jpg"))
    }

    /// Open Library page for this book, resolved against `site`.
    ///
    /// Returns `None` when the key cannot be joined onto the site URL.
    #[must_use]
    pub fn page_url(&self, site: &Url) -> Option<Url> {
        site.join(&self.key).ok()
    }

    /// True when both records share the same key.
    #[must_use]
    pub fn same_key(&self, other: &Book) -> bool {
        self.key == other.key
    }
}
