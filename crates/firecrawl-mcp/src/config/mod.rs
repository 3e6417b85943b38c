//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit CLI value, then environment, then default.

use std::time::Duration;

use firecrawl_core::{ClientConfig, FirecrawlClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};

use crate::types::{McpError, McpResult};

pub const API_KEY_ENV: &str = "FIRECRAWL_API_KEY";
pub const API_URL_ENV: &str = "FIRECRAWL_API_URL";
pub const TIMEOUT_ENV: &str = "FIRECRAWL_TIMEOUT_SECS";
pub const TOKEN_ENV: &str = "FIRECRAWL_MCP_TOKEN";

/// Settings supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

fn from_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the Firecrawl API key.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<String> {
    resolve_api_key_with(explicit, from_env)
}

fn resolve_api_key_with(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    non_empty(explicit.map(str::to_string)).or_else(|| non_empty(env(API_KEY_ENV)))
}

/// Resolve the Firecrawl API base URL.
pub fn resolve_api_url(explicit: Option<&str>) -> String {
    resolve_api_url_with(explicit, from_env)
}

fn resolve_api_url_with(explicit: Option<&str>, env: impl Fn(&str) -> Option<String>) -> String {
    non_empty(explicit.map(str::to_string))
        .or_else(|| non_empty(env(API_URL_ENV)))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Resolve the request timeout. Unparseable or zero values fall back to the default.
pub fn resolve_timeout(explicit: Option<u64>) -> Duration {
    resolve_timeout_with(explicit, from_env)
}

fn resolve_timeout_with(explicit: Option<u64>, env: impl Fn(&str) -> Option<String>) -> Duration {
    let env_secs = || {
        let raw = non_empty(env(TIMEOUT_ENV))?;
        match raw.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                tracing::warn!("Ignoring {TIMEOUT_ENV}={raw}: not a number of seconds");
                None
            }
        }
    };

    explicit
        .or_else(env_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

/// Resolve the bearer token required by the HTTP transport.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
    non_empty(explicit.map(str::to_string)).or_else(|| non_empty(from_env(TOKEN_ENV)))
}

/// Build the client configuration, failing when no API key is available.
pub fn client_config(options: &ServerOptions) -> McpResult<ClientConfig> {
    let api_key = resolve_api_key(options.api_key.as_deref()).ok_or_else(|| {
        McpError::Config(format!(
            "no Firecrawl API key: pass --api-key or set {API_KEY_ENV}"
        ))
    })?;

    Ok(ClientConfig::new(api_key)
        .with_api_url(resolve_api_url(options.api_url.as_deref()))
        .with_timeout(resolve_timeout(options.timeout_secs)))
}

/// Build a ready-to-use client from command-line options and the environment.
pub fn build_client(options: &ServerOptions) -> McpResult<FirecrawlClient> {
    let config = client_config(options)?;
    tracing::info!("Firecrawl API: {}", config.api_url);
    FirecrawlClient::new(config).map_err(|e| McpError::Config(e.to_string()))
}
