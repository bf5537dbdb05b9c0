//! Best-effort sharing of a book through an external capability.
//!
//! Sharing is fire-and-forget: [`share_book`] checks availability, then hands
//! the payload to a detached task whose outcome is only logged. The terminal
//! equivalent of a native share sheet is a user-configured command
//! ([`CommandShareTarget`]); without one, sharing is reported as unsupported.

mod command;

pub use command::CommandShareTarget;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::book::{Book, UNKNOWN_AUTHOR};

/// Notification shown when no share capability is available.
pub const SHARE_UNSUPPORTED_MESSAGE: &str = "Sharing is not supported on this system";

/// Errors reported by a share target. Only ever logged.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The share program could not be started.
    #[error(
        "failed to start share command '{program}': {source}\n  Suggestion: Check that `share_command` names an installed program"
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The share program ran but reported failure.
    #[error("share command '{program}' exited with {status}")]
    Failed { program: String, status: String },
    /// Writing the payload to the share program failed.
    #[error("failed to send payload to share command: {0}")]
    Io(#[from] std::io::Error),
}

/// What gets shared: title, summary text, and a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    /// Builds the payload for a book, linking to `page_url`.
    #[must_use]
    pub fn for_book(book: &Book, page_url: &str) -> Self {
        Self {
            title: book.title.clone(),
            text: format!(
                "Check out this book: {} by {}",
                book.title,
                book.authors_or(UNKNOWN_AUTHOR)
            ),
            url: page_url.to_string(),
        }
    }
}

/// An external sharing capability.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// True when this target can share on the current system.
    fn is_available(&self) -> bool;

    /// Hands the payload to the capability.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError`] when the capability rejects or fails the share.
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// A target that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedShareTarget;

#[async_trait]
impl ShareTarget for UnsupportedShareTarget {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<(), ShareError> {
        Ok(())
    }
}

/// Outcome of [`share_book`].
#[derive(Debug)]
pub enum ShareDispatch {
    /// Handed to a detached task; awaiting the handle is optional.
    Dispatched(JoinHandle<()>),
    /// No capability available; show [`SHARE_UNSUPPORTED_MESSAGE`] to the user.
    Unsupported,
}

impl ShareDispatch {
    /// Waits for a dispatched share to finish. No-op when unsupported.
    pub async fn wait(self) {
        if let Self::Dispatched(handle) = self
            && let Err(error) = handle.await
        {
            warn!(error = %error, "Share task did not complete");
        }
    }
}

/// Shares a book through `target` without waiting for the result.
///
/// Must be called inside a tokio runtime.
pub fn share_book(target: &Arc<dyn ShareTarget>, book: &Book, site: &Url) -> ShareDispatch {
    if !target.is_available() {
        info!(key = %book.key, "Share capability unavailable");
        return ShareDispatch::Unsupported;
    }

    let page_url = book
        .page_url(site)
        .map_or_else(|| site.to_string(), |url| url.to_string());
    let payload = SharePayload::for_book(book, &page_url);
    let target = Arc::clone(target);
    let key = book.key.clone();

    ShareDispatch::Dispatched(tokio::spawn(async move {
        match target.share(&payload).await {
            Ok(()) => info!(%key, "Shared successfully"),
            Err(error) => warn!(%key, error = %error, "Error sharing"),
        }
    }))
}
