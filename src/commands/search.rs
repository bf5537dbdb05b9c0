//! Search command handler: one search, optional favorite toggles, one render.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bookfinder_core::search::SOMETHING_WENT_WRONG;
use bookfinder_core::{FavoriteChange, view};
use tracing::info;

use crate::app_config::Settings;
use crate::cli::SearchArgs;
use crate::output;

pub async fn run_search_command(settings: &Settings, args: &SearchArgs) -> Result<ExitCode> {
    let mut finder = super::build_finder(settings)?;
    finder.set_query(args.query_text());
    finder.search().await;

    for position in &args.favorite {
        let index = usize::from(*position) - 1;
        let Some(book) = finder.state().books.get(index).cloned() else {
            println!("No result #{position} to favorite.");
            continue;
        };
        let change = finder
            .toggle_favorite(&book)
            .context("Failed to save favorites")?;
        info!(key = %book.key, ?change, "Updated favorite from search");
        match change {
            FavoriteChange::Added => println!("Added \"{}\" to favorites.", book.title),
            FavoriteChange::Removed => println!("Removed \"{}\" from favorites.", book.title),
        }
    }

    let state = finder.state();
    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &state.books)?;
        writeln!(stdout)?;
    } else {
        output::write_lines(&mut stdout, &view::render(state, output::terminal_width()))?;
    }

    if state.error.as_deref() == Some(SOMETHING_WENT_WRONG) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
