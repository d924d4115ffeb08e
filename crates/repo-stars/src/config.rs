//! Settings read from the process environment, after loading a local `.env` file.

use crate::callers::DEFAULT_OPENAI_URL;
use crate::github::{DEFAULT_GITHUB_URL, STAR_THRESHOLD};
use crate::{Model, RetryPolicy};
use std::env;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ConfigErr {
    #[error("unknown model {0:?}")]
    UnknownModel(String),
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: Model,
    pub github_api_url: String,
    pub star_threshold: u64,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_URL.into(),
            model: Model::default(),
            github_api_url: DEFAULT_GITHUB_URL.into(),
            star_threshold: STAR_THRESHOLD,
            retry: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("github_api_url", &self.github_api_url)
            .field("star_threshold", &self.star_threshold)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Config {
    /// Loads `.env` from the working directory (if present), then reads the environment.
    pub fn load() -> Result<Self, ConfigErr> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) => debug!(error = %e, "no .env loaded"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or empty keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let model = match get("OPENAI_MODEL") {
            Some(m) => Model::try_from(m.trim()).map_err(|_| ConfigErr::UnknownModel(m))?,
            None => defaults.model,
        };

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            model,
            github_api_url: get("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            star_threshold: parse_number(&get, "STAR_THRESHOLD")?
                .unwrap_or(defaults.star_threshold),
            retry: RetryPolicy {
                max_attempts: parse_number(&get, "RETRY_MAX_ATTEMPTS")?
                    .unwrap_or(defaults.retry.max_attempts),
                ..defaults.retry
            },
        })
    }
}

fn parse_number<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigErr> {
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigErr::InvalidNumber { key, value })
        })
        .transpose()
}
