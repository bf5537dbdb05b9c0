//! Interactive session: the search and results views behind a line prompt.
//!
//! On the search view every line is a title query (`:q` quits). On the
//! results view the line is a command: `f N` / `f FN` toggles a favorite,
//! `s N` / `s FN` shares, `b` goes back, `q` quits.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use bookfinder_core::{
    Book, BookFinder, FavoriteChange, Page, SHARE_UNSUPPORTED_MESSAGE, ShareDispatch, view,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::app_config::Settings;
use crate::output;

const RESULTS_HELP: &str =
    "Commands: f N (favorite result N), f FN (favorite F-card N), s N / s FN (share), b (back), q (quit)";

#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionOptions {
    pub width: usize,
    pub spinner: bool,
}

pub async fn run_interactive_command(settings: &Settings) -> Result<ExitCode> {
    let mut finder = super::build_finder(settings)?;
    let options = SessionOptions {
        width: output::terminal_width(),
        spinner: io::stderr().is_terminal(),
    };
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    run_session(&mut finder, input, &mut stdout, options).await?;
    Ok(ExitCode::SUCCESS)
}

/// Runs the prompt loop until quit or end of input.
pub(crate) async fn run_session<R, W>(
    finder: &mut BookFinder,
    input: R,
    out: &mut W,
    options: SessionOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut pending_shares = Vec::new();
    loop {
        output::write_lines(out, &view::render(finder.state(), options.width))?;
        write!(out, "{}", prompt(finder.page()))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim();
        writeln!(out)?;

        match finder.page() {
            Page::Search => {
                if line == ":q" {
                    break;
                }
                finder.set_query(line);
                run_search(finder, options.spinner).await;
            }
            Page::Results => match parse_results_command(line) {
                ResultsCommand::Quit => break,
                ResultsCommand::Back => finder.back_to_search(),
                ResultsCommand::Redraw => {}
                ResultsCommand::Help => writeln!(out, "{RESULTS_HELP}")?,
                ResultsCommand::ToggleFavorite(selection) => {
                    toggle_selected(finder, selection, out)?;
                }
                ResultsCommand::Share(selection) => {
                    if let Some(dispatch) = share_selected(finder, selection, out)? {
                        pending_shares.push(dispatch);
                    }
                }
                ResultsCommand::Unknown(text) => {
                    writeln!(out, "Unknown command '{text}'. {RESULTS_HELP}")?;
                }
            },
        }
    }

    // The runtime shuts down when the session returns; finish shares first.
    if !pending_shares.is_empty() {
        debug!(count = pending_shares.len(), "Waiting for dispatched shares");
    }
    for dispatch in pending_shares {
        dispatch.wait().await;
    }
    Ok(())
}

fn prompt(page: Page) -> &'static str {
    match page {
        Page::Search => "search> ",
        Page::Results => "results> ",
    }
}

async fn run_search(finder: &mut BookFinder, spinner: bool) {
    let progress = spinner.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner());
        bar.set_message(view::LOADING);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    });
    finder.search().await;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
}

fn toggle_selected(
    finder: &mut BookFinder,
    selection: Selection,
    out: &mut impl Write,
) -> Result<()> {
    let Some(book) = selected_book(finder, selection) else {
        writeln!(out, "Nothing at {selection}.")?;
        return Ok(());
    };
    match finder.toggle_favorite(&book) {
        Ok(FavoriteChange::Added) => writeln!(out, "Added \"{}\" to favorites.", book.title)?,
        Ok(FavoriteChange::Removed) => {
            writeln!(out, "Removed \"{}\" from favorites.", book.title)?;
        }
        Err(error) => writeln!(out, "Could not save favorites: {error}")?,
    }
    Ok(())
}

fn share_selected(
    finder: &BookFinder,
    selection: Selection,
    out: &mut impl Write,
) -> Result<Option<ShareDispatch>> {
    let Some(book) = selected_book(finder, selection) else {
        writeln!(out, "Nothing at {selection}.")?;
        return Ok(None);
    };
    match finder.share(&book) {
        ShareDispatch::Unsupported => {
            writeln!(out, "{SHARE_UNSUPPORTED_MESSAGE}.")?;
            Ok(None)
        }
        dispatched @ ShareDispatch::Dispatched(_) => {
            debug!(key = %book.key, "Share dispatched");
            writeln!(out, "Sharing \"{}\"...", book.title)?;
            Ok(Some(dispatched))
        }
    }
}

fn selected_book(finder: &BookFinder, selection: Selection) -> Option<Book> {
    let state = finder.state();
    match selection {
        Selection::Result(index) => state.books.get(index),
        Selection::Favorite(index) => state.favorites.as_slice().get(index),
    }
    .cloned()
}

/// A card on the results view, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Result(usize),
    Favorite(usize),
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Result(index) => write!(f, "result {}", index + 1),
            Self::Favorite(index) => write!(f, "favorite F{}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResultsCommand {
    Back,
    Quit,
    Redraw,
    Help,
    ToggleFavorite(Selection),
    Share(Selection),
    Unknown(String),
}

fn parse_results_command(line: &str) -> ResultsCommand {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next();
    if parts.next().is_some() {
        return ResultsCommand::Unknown(line.to_string());
    }

    match (verb, arg) {
        ("", None) => ResultsCommand::Redraw,
        ("b" | "back", None) => ResultsCommand::Back,
        ("q" | "quit" | ":q", None) => ResultsCommand::Quit,
        ("?" | "h" | "help", None) => ResultsCommand::Help,
        ("f" | "fav", Some(arg)) => parse_selection(arg).map_or_else(
            || ResultsCommand::Unknown(line.to_string()),
            ResultsCommand::ToggleFavorite,
        ),
        ("s" | "share", Some(arg)) => parse_selection(arg).map_or_else(
            || ResultsCommand::Unknown(line.to_string()),
            ResultsCommand::Share,
        ),
        _ => ResultsCommand::Unknown(line.to_string()),
    }
}

/// Parses `3` (third result) or `F2` (second favorite card).
fn parse_selection(raw: &str) -> Option<Selection> {
    let (favorite, digits) = match raw.strip_prefix(['F', 'f']) {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let number = digits.parse::<usize>().ok()?.checked_sub(1)?;
    Some(if favorite {
        Selection::Favorite(number)
    } else {
        Selection::Result(number)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use bookfinder_core::{
        BookSearch, KeyValueStorage, MemoryStorage, SearchError, UnsupportedShareTarget,
        load_favorites,
    };
    use bookfinder_core::share::{ShareError, SharePayload, ShareTarget};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    struct DuneSearch;

    #[async_trait]
    impl BookSearch for DuneSearch {
        fn name(&self) -> &'static str {
            "dune"
        }

        async fn search_books(&self, query: &str) -> Result<Vec<Book>, SearchError> {
            if query != "dune" {
                return Err(SearchError::no_results(query));
            }
            let mut book = Book::new("/works/OL1W", "Dune");
            book.author_name = Some(vec!["Frank Herbert".to_string()]);
            book.first_publish_year = Some(1965);
            Ok(vec![book])
        }
    }

    /// Storage handle the test keeps after the session owns a boxed clone.
    #[derive(Clone, Default)]
    struct SharedMemory(Arc<MemoryStorage>);

    impl KeyValueStorage for SharedMemory {
        fn get(&self, key: &str) -> Result<Option<String>, bookfinder_core::StorageError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), bookfinder_core::StorageError> {
            self.0.set(key, value)
        }
    }

    fn finder(storage: SharedMemory) -> BookFinder {
        BookFinder::new(
            Arc::new(DuneSearch),
            Box::new(storage),
            Arc::new(UnsupportedShareTarget),
            Url::parse("https://openlibrary.org").unwrap(),
        )
    }

    async fn run(finder: &mut BookFinder, input: &str) -> String {
        let mut out = Vec::new();
        let options = SessionOptions {
            width: 80,
            spinner: false,
        };
        run_session(finder, input.as_bytes(), &mut out, options)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("3"), Some(Selection::Result(2)));
        assert_eq!(parse_selection("F2"), Some(Selection::Favorite(1)));
        assert_eq!(parse_selection("f1"), Some(Selection::Favorite(0)));
        assert_eq!(parse_selection("0"), None);
        assert_eq!(parse_selection("x"), None);
    }

    #[test]
    fn test_parse_results_command() {
        assert_eq!(parse_results_command("b"), ResultsCommand::Back);
        assert_eq!(parse_results_command("q"), ResultsCommand::Quit);
        assert_eq!(parse_results_command(""), ResultsCommand::Redraw);
        assert_eq!(
            parse_results_command("f 1"),
            ResultsCommand::ToggleFavorite(Selection::Result(0))
        );
        assert_eq!(
            parse_results_command("s F1"),
            ResultsCommand::Share(Selection::Favorite(0))
        );
        assert!(matches!(parse_results_command("f"), ResultsCommand::Unknown(_)));
        assert!(matches!(parse_results_command("f 1 2"), ResultsCommand::Unknown(_)));
    }

    #[tokio::test]
    async fn test_session_search_then_favorite_persists() {
        let storage = SharedMemory::default();
        let mut app = finder(storage.clone());

        let text = run(&mut app, "dune\nf 1\nq\n").await;
        assert!(text.contains("📚 Book Finder"));
        assert!(text.contains("[1] Dune"));
        assert!(text.contains("Added \"Dune\" to favorites."));
        assert!(text.contains("⭐ Favorites (1)"));

        let reloaded = load_favorites(&storage);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.as_slice()[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_session_empty_query_stays_on_search_view() {
        let mut app = finder(SharedMemory::default());
        let text = run(&mut app, "\n:q\n").await;
        assert!(!text.contains("📚 Search Results"));
        assert_eq!(app.page(), Page::Search);
    }

    #[tokio::test]
    async fn test_session_no_results_message_and_back() {
        let mut app = finder(SharedMemory::default());
        let text = run(&mut app, "zzzz\nb\n:q\n").await;
        assert!(text.contains("No books found"));
        assert_eq!(app.page(), Page::Search);
    }

    #[tokio::test]
    async fn test_session_share_unsupported_notifies() {
        let mut app = finder(SharedMemory::default());
        let text = run(&mut app, "dune\ns 1\nq\n").await;
        assert!(text.contains("Sharing is not supported on this system."));
    }

    #[tokio::test]
    async fn test_session_out_of_range_selection() {
        let mut app = finder(SharedMemory::default());
        let text = run(&mut app, "dune\nf 5\nf F1\nq\n").await;
        assert!(text.contains("Nothing at result 5."));
        assert!(text.contains("Nothing at favorite F1."));
    }

    #[tokio::test]
    async fn test_session_ends_on_eof() {
        let mut app = finder(SharedMemory::default());
        let text = run(&mut app, "dune\n").await;
        assert!(text.contains("[1] Dune"));
        assert_eq!(app.page(), Page::Results);
    }

    /// Finishes each share only after a short delay.
    #[derive(Default)]
    struct SlowShareTarget {
        completed: AtomicUsize,
    }

    #[async_trait]
    impl ShareTarget for SlowShareTarget {
        fn is_available(&self) -> bool {
            true
        }

        async fn share(&self, _payload: &SharePayload) -> Result<(), ShareError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_session_finishes_dispatched_share_before_returning() {
        let target = Arc::new(SlowShareTarget::default());
        let mut app = BookFinder::new(
            Arc::new(DuneSearch),
            Box::new(SharedMemory::default()),
            target.clone(),
            Url::parse("https://openlibrary.org").unwrap(),
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let text = runtime.block_on(run(&mut app, "dune\ns 1\nq\n"));
        // Dropping the runtime cancels any task still in flight.
        drop(runtime);

        assert!(text.contains("Sharing \"Dune\"..."));
        assert_eq!(target.completed.load(Ordering::SeqCst), 1);
    }
}
