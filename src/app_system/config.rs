use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://gorest.co.in/public/v2";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Command-line arguments. Flags fall back to the environment, which may be
/// populated from a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "End-to-end checks for a GoRest-compatible users API",
    long_about = None
)]
pub struct Cli {
    /// Base URL of the API, without the `/users` suffix
    #[arg(long, env = "GOREST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Bearer token for authenticated requests
    #[arg(long, env = "GOREST_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "GOREST_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// `per_page` used by the pagination check
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Run against an in-process mock of the users API instead of --base-url
    #[arg(long)]
    pub mock: bool,

    /// Seed for the synthetic test user, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    pub base_url: String,
    pub access_token: String,
    pub request_timeout: Duration,
    pub page_size: u32,
}

impl SuiteConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let access_token = cli
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        Self::build(cli, &cli.base_url, access_token)
    }

    /// Configuration for a run against a mock service at `base_url`.
    pub fn for_mock(cli: &Cli, base_url: &str, token: &str) -> Result<Self, ConfigError> {
        Self::build(cli, base_url, token)
    }

    fn build(cli: &Cli, base_url: &str, token: &str) -> Result<Self, ConfigError> {
        if cli.page_size == 0 || cli.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(cli.page_size));
        }
        if cli.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            access_token: token.to_string(),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            page_size: cli.page_size,
        })
    }
}

/// Trims whitespace and trailing slashes; the scheme must be http or https.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl(raw.to_string()))
    }
}
