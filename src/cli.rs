//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Search Open Library by title and keep a list of favorite books.
///
/// Run without a subcommand for an interactive session.
#[derive(Parser, Debug)]
#[command(name = "bookfinder")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding persisted favorites
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Search API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Command that receives shared books on stdin (e.g. `wl-copy`)
    #[arg(long, value_name = "COMMAND", global = true)]
    pub share_command: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search by title and print the results view
    Search(SearchArgs),
    /// List or edit stored favorites
    Favorites(FavoritesArgs),
    /// Share a favorite through the configured share command
    Share(ShareArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Title to search for (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Toggle the favorite state of result N after searching (repeatable)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=12))]
    pub favorite: Vec<u8>,

    /// Print results as JSON instead of cards
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    #[must_use]
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Debug, Clone)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: Option<FavoritesCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesCommand {
    /// Print stored favorites (default)
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a favorite by key (e.g. /works/OL45883W)
    Remove { key: String },
    /// Remove all favorites
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct ShareArgs {
    /// Key of a stored favorite (e.g. /works/OL45883W)
    pub key: String,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Show effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["bookfinder"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["bookfinder", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_search_joins_query_words() {
        let cli = Cli::try_parse_from(["bookfinder", "search", "the", "hobbit"]).unwrap();
        let Some(Command::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query_text(), "the hobbit");
        assert!(args.favorite.is_empty());
        assert!(!args.json);
    }

    #[test]
    fn test_cli_search_requires_query() {
        let err = Cli::try_parse_from(["bookfinder", "search"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_search_favorite_range() {
        let cli = Cli::try_parse_from(["bookfinder", "search", "dune", "-f", "1", "-f", "12"])
            .unwrap();
        let Some(Command::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.favorite, vec![1, 12]);

        let err = Cli::try_parse_from(["bookfinder", "search", "dune", "-f", "13"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        let err = Cli::try_parse_from(["bookfinder", "search", "dune", "-f", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bookfinder",
            "favorites",
            "--data-dir",
            "/tmp/bf",
            "--api-base-url",
            "http://localhost:9",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/bf")));
        assert_eq!(cli.api_base_url.as_deref(), Some("http://localhost:9"));
        assert!(matches!(
            cli.command,
            Some(Command::Favorites(FavoritesArgs { command: None }))
        ));
    }

    #[test]
    fn test_cli_favorites_remove_takes_key() {
        let cli =
            Cli::try_parse_from(["bookfinder", "favorites", "remove", "/works/OL1W"]).unwrap();
        let Some(Command::Favorites(FavoritesArgs {
            command: Some(FavoritesCommand::Remove { key }),
        })) = cli.command
        else {
            panic!("expected favorites remove");
        };
        assert_eq!(key, "/works/OL1W");
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["bookfinder", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Cli::try_parse_from(["bookfinder", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
