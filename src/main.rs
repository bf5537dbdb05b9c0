//! CLI entry point for the bookfinder tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod output;

use cli::{Cli, Command, ConfigCommand, FavoritesCommand};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded_config = app_config::load_default_file_config()?;
    let settings = app_config::resolve_settings(&cli, &loaded_config)?;

    init_tracing(settings.log_level);
    debug!(?cli, "CLI arguments parsed");
    debug!(?settings, "Settings resolved");

    match &cli.command {
        None => commands::run_interactive_command(&settings).await,
        Some(Command::Search(args)) => commands::run_search_command(&settings, args).await,
        Some(Command::Favorites(args)) => {
            let command = args
                .command
                .clone()
                .unwrap_or(FavoritesCommand::List { json: false });
            commands::run_favorites_command(&settings, &command)
        }
        Some(Command::Share(args)) => commands::run_share_command(&settings, args).await,
        Some(Command::Config {
            command: ConfigCommand::Show,
        }) => commands::run_config_show_command(&settings, &loaded_config),
    }
}

/// Logs go to stderr so rendered views on stdout stay clean.
/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > config verbosity.
fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
