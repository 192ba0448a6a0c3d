use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, AppResult};
use crate::ogp::{DEFAULT_FETCH_TIMEOUT, USER_AGENT};

pub const DEFAULT_SITE_NAME: &str = "Scraps Doc";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1112/";

/// Upper bound on the per-card wait; pages are expected to settle within it.
pub const MAX_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct Config {
    pub site_name: String,
    pub base_url: Url,
    /// Metadata provider endpoint. `None` fetches linked pages directly.
    pub provider_url: Option<Url>,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
            provider_url: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("SCRAPS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("SCRAPS_BASE_URL '{base_url}': {e}")))?;

        let provider_url = match env::var("OGP_PROVIDER_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim())
                    .map_err(|e| AppError::Config(format!("OGP_PROVIDER_URL '{raw}': {e}")))?,
            ),
            _ => None,
        };

        let config = Config {
            site_name: env::var("SCRAPS_SITE_NAME").unwrap_or_else(|_| DEFAULT_SITE_NAME.to_string()),
            base_url,
            provider_url,
            fetch_timeout: parse_fetch_timeout(env::var("OGP_FETCH_TIMEOUT_MS").ok()),
            user_agent: env::var("OGP_USER_AGENT").unwrap_or_else(|_| USER_AGENT.to_string()),
        };

        tracing::info!(
            site_name = %config.site_name,
            base_url = %config.base_url,
            provider = config.provider_url.as_ref().map(Url::as_str).unwrap_or("direct"),
            fetch_timeout_ms = config.fetch_timeout.as_millis() as u64,
            "configuration loaded"
        );

        Ok(config)
    }
}

fn parse_fetch_timeout(raw: Option<String>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_FETCH_TIMEOUT;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 && Duration::from_millis(ms) <= MAX_FETCH_TIMEOUT => Duration::from_millis(ms),
        _ => {
            tracing::warn!(value = %raw, "OGP_FETCH_TIMEOUT_MS must be 1..=5000, using default");
            DEFAULT_FETCH_TIMEOUT
        }
    }
}
