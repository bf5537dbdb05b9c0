//! CLI command handlers.

mod config;
mod favorites;
mod interactive;
mod search;
mod share;

pub use config::run_config_show_command;
pub use favorites::run_favorites_command;
pub use interactive::run_interactive_command;
pub use search::run_search_command;
pub use share::run_share_command;

use std::sync::Arc;

use anyhow::{Context, Result};
use bookfinder_core::{
    BookFinder, BookSearch, CommandShareTarget, FileStorage, SearchClient, ShareTarget,
    UnsupportedShareTarget,
};
use tracing::debug;

use crate::app_config::Settings;

/// Builds the controller from effective settings, loading stored favorites.
pub(crate) fn build_finder(settings: &Settings) -> Result<BookFinder> {
    let search: Arc<dyn BookSearch> = Arc::new(
        SearchClient::with_timeouts(&settings.api_base_url, settings.timeouts)
            .context("Failed to create search client")?,
    );
    let storage = FileStorage::new(&settings.data_dir);
    debug!(data_dir = %settings.data_dir.display(), "Using favorites storage");

    Ok(BookFinder::new(
        search,
        Box::new(storage),
        share_target(settings),
        settings.site_url.clone(),
    ))
}

fn share_target(settings: &Settings) -> Arc<dyn ShareTarget> {
    match settings
        .share_command
        .as_deref()
        .and_then(CommandShareTarget::from_command_line)
    {
        Some(target) => Arc::new(target),
        None => Arc::new(UnsupportedShareTarget),
    }
}
