//! Application configuration: optional config file merged with CLI flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bookfinder_core::HttpTimeouts;
use bookfinder_core::favorites::default_data_dir;
use bookfinder_core::search::DEFAULT_API_BASE_URL;
use url::Url;

use crate::cli::Cli;

/// File configuration (`config.toml`, flat `key = value` lines).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Search API base URL.
    pub api_base_url: Option<String>,
    /// Directory holding persisted favorites.
    pub data_dir: Option<PathBuf>,
    /// Command that receives shared books.
    pub share_command: Option<String>,
    /// Search client connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Search client whole-request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(base) = self.api_base_url.as_deref() {
            validate_base_url(base)
                .with_context(|| format!("Invalid config value for `api_base_url`: '{base}'"))?;
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=600");
    }
    Ok(())
}

fn validate_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Expected an http or https URL");
    }
    Ok(url)
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/bookfinder/config.toml`
/// 2. `$HOME/.config/bookfinder/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("bookfinder")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("bookfinder")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "api_base_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `api_base_url` value on line {line_no}"))?;
                cfg.api_base_url = Some(parsed);
            }
            "data_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `data_dir` value on line {line_no}"))?;
                cfg.data_dir = Some(PathBuf::from(parsed));
            }
            "share_command" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `share_command` value on line {line_no}"))?;
                cfg.share_command = Some(parsed);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_no}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `read_timeout_secs` value on line {line_no}")
                })?;
                cfg.read_timeout_secs = Some(parsed);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_no}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        other => bail!("Expected one of: default, verbose, quiet, debug (got '{other}')"),
    }
}

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub site_url: Url,
    pub data_dir: PathBuf,
    pub share_command: Option<String>,
    pub timeouts: HttpTimeouts,
    pub log_level: &'static str,
    pub verbosity_label: &'static str,
}

/// Merges CLI flags over file config over defaults.
pub fn resolve_settings(cli: &Cli, loaded: &LoadedConfig) -> Result<Settings> {
    let file = loaded.config.clone().unwrap_or_default();

    let api_base_url = cli
        .api_base_url
        .clone()
        .or(file.api_base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let site_url = validate_base_url(&api_base_url)
        .with_context(|| format!("Invalid API base URL '{api_base_url}'"))?;

    let data_dir = match cli.data_dir.clone().or(file.data_dir) {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    let share_command = cli
        .share_command
        .clone()
        .or(file.share_command)
        .filter(|command| !command.trim().is_empty());

    let defaults = HttpTimeouts::default();
    let timeouts = HttpTimeouts {
        connect_secs: file.connect_timeout_secs.unwrap_or(defaults.connect_secs),
        read_secs: file.read_timeout_secs.unwrap_or(defaults.read_secs),
    };

    let verbosity = effective_verbosity(cli.verbose, cli.quiet, file.verbosity);

    Ok(Settings {
        api_base_url,
        site_url,
        data_dir,
        share_command,
        timeouts,
        log_level: log_level(verbosity, cli.verbose),
        verbosity_label: verbosity.as_str(),
    })
}

fn effective_verbosity(
    verbose: u8,
    quiet: bool,
    file_verbosity: Option<VerbositySetting>,
) -> VerbositySetting {
    if quiet {
        VerbositySetting::Quiet
    } else if verbose >= 2 {
        VerbositySetting::Debug
    } else if verbose == 1 {
        VerbositySetting::Verbose
    } else {
        file_verbosity.unwrap_or(VerbositySetting::Default)
    }
}

fn log_level(verbosity: VerbositySetting, verbose_count: u8) -> &'static str {
    match verbosity {
        VerbositySetting::Quiet => "error",
        VerbositySetting::Default => "warn",
        VerbositySetting::Verbose => "info",
        VerbositySetting::Debug if verbose_count >= 3 => "trace",
        VerbositySetting::Debug => "debug",
    }
}
