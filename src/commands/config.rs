//! Config command handlers: show effective configuration.

use std::process::ExitCode;

use anyhow::Result;

use crate::app_config::{LoadedConfig, Settings};

pub fn run_config_show_command(settings: &Settings, loaded: &LoadedConfig) -> Result<ExitCode> {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded.loaded_from_file() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("api_base_url = {}", settings.api_base_url);
    println!("data_dir = {}", settings.data_dir.display());
    println!(
        "share_command = {}",
        settings.share_command.as_deref().unwrap_or("<none>")
    );
    println!("connect_timeout_secs = {}", settings.timeouts.connect_secs);
    println!("read_timeout_secs = {}", settings.timeouts.read_secs);
    println!("verbosity = {}", settings.verbosity_label);

    Ok(ExitCode::SUCCESS)
}
