//! Favorites command handlers: list, remove, clear.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bookfinder_core::book::UNKNOWN_AUTHOR;
use bookfinder_core::{Favorites, view};

use crate::app_config::Settings;
use crate::cli::FavoritesCommand;
use crate::output;

pub fn run_favorites_command(settings: &Settings, command: &FavoritesCommand) -> Result<ExitCode> {
    let mut finder = super::build_finder(settings)?;

    match command {
        FavoritesCommand::List { json } => {
            let favorites = &finder.state().favorites;
            let mut stdout = io::stdout().lock();
            if *json {
                serde_json::to_writer_pretty(&mut stdout, favorites)?;
                writeln!(stdout)?;
            } else {
                let lines = favorites_list_lines(favorites, output::terminal_width());
                output::write_lines(&mut stdout, &lines)?;
            }
        }
        FavoritesCommand::Remove { key } => {
            match finder
                .remove_favorite(key)
                .context("Failed to save favorites")?
            {
                Some(book) => println!("Removed \"{}\" from favorites.", book.title),
                None => {
                    println!("No favorite with key '{key}'.");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        FavoritesCommand::Clear => {
            let count = finder
                .clear_favorites()
                .context("Failed to save favorites")?;
            println!("Removed {count} favorite(s).");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// One line per favorite: label, title, authors, key.
fn favorites_list_lines(favorites: &Favorites, width: usize) -> Vec<String> {
    if favorites.is_empty() {
        return vec!["No favorites yet.".to_string()];
    }
    let mut lines = vec![format!("⭐ Favorites ({})", favorites.len())];
    lines.extend(favorites.iter().enumerate().map(|(index, book)| {
        view::truncate_to_width(
            &format!(
                "[F{}] {} by {} ({})",
                index + 1,
                book.title,
                book.authors_or(UNKNOWN_AUTHOR),
                book.key
            ),
            width,
        )
    }));
    lines
}
