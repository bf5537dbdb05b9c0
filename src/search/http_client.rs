//! HTTP client construction policy for the search service.
//!
//! Centralizes timeout, user-agent, compression, and proxy defaults so the
//! search client and tests build identical clients.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use super::SearchError;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default whole-request timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Timeouts applied to search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect_secs: u64,
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

/// Builds the search HTTP client.
///
/// # Errors
///
/// Returns [`SearchError::Client`] when client construction fails.
pub fn build_search_http_client(
    user_agent: &str,
    timeouts: HttpTimeouts,
) -> Result<Client, SearchError> {
    match try_build_client(user_agent, timeouts, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic when querying system
            // proxy settings; env proxies still apply on the fallback path.
            warn!("Search client hit system proxy panic; using env-proxy fallback builder");
            match try_build_client(user_agent, timeouts, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(SearchError::client(
                    "HTTP client construction panicked while reading proxy settings",
                )),
                Err(BuildClientFailure::Build(error)) => {
                    Err(SearchError::client(error.to_string()))
                }
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(SearchError::client(error.to_string())),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    user_agent: &str,
    timeouts: HttpTimeouts,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let user_agent = user_agent.to_string();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(user_agent, timeouts);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(user_agent: String, timeouts: HttpTimeouts) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.read_secs))
        .user_agent(user_agent)
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = first_env_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = first_env_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn first_env_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
