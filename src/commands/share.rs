//! Share command handler: share one stored favorite and wait for the hand-off.

use std::process::ExitCode;

use anyhow::Result;
use bookfinder_core::{SHARE_UNSUPPORTED_MESSAGE, ShareDispatch};

use crate::app_config::Settings;
use crate::cli::ShareArgs;

pub async fn run_share_command(settings: &Settings, args: &ShareArgs) -> Result<ExitCode> {
    let finder = super::build_finder(settings)?;
    let Some(book) = finder.state().favorites.get(&args.key).cloned() else {
        println!(
            "What: No favorite with key '{}'\nWhy: Only stored favorites can be shared from the command line\nFix: Run `bookfinder favorites` to list keys.",
            args.key
        );
        return Ok(ExitCode::FAILURE);
    };

    match finder.share(&book) {
        ShareDispatch::Unsupported => {
            eprintln!("{SHARE_UNSUPPORTED_MESSAGE}. Set `share_command` in config or pass --share-command.");
            Ok(ExitCode::FAILURE)
        }
        dispatched @ ShareDispatch::Dispatched(_) => {
            // The process would exit before a detached share finished.
            dispatched.wait().await;
            println!("Shared \"{}\".", book.title);
            Ok(ExitCode::SUCCESS)
        }
    }
}
