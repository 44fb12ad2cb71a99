//! Client settings read from the environment.

use std::{env, str::FromStr, time::Duration};

use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const API_BASE_URL_VAR: &str = "ATELIER_API_BASE_URL";
pub const API_TOKEN_VAR: &str = "ATELIER_API_TOKEN";
pub const POLL_INTERVAL_VAR: &str = "ATELIER_POLL_INTERVAL_MS";
pub const MAX_POLL_ATTEMPTS_VAR: &str = "ATELIER_MAX_POLL_ATTEMPTS";

const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 90;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub auth_token: Option<SecretString>,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl ClientConfig {
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            auth_token: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_base = lookup(API_BASE_URL_VAR).ok_or(ConfigError::Missing(API_BASE_URL_VAR))?;
        let api_base_url = Url::parse(raw_base.trim()).map_err(|e| ConfigError::Invalid {
            key: API_BASE_URL_VAR,
            reason: e.to_string(),
        })?;

        let auth_token = lookup(API_TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        let poll_interval = Duration::from_millis(parse_or_default(
            &lookup,
            POLL_INTERVAL_VAR,
            DEFAULT_POLL_INTERVAL_MS,
        )?);
        let max_poll_attempts =
            parse_or_default(&lookup, MAX_POLL_ATTEMPTS_VAR, DEFAULT_MAX_POLL_ATTEMPTS)?;
        if max_poll_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_POLL_ATTEMPTS_VAR,
                reason: "must be at least 1".to_string(),
            });
        }

        info!(
            api_base_url = %api_base_url,
            has_token = auth_token.is_some(),
            poll_interval_ms = poll_interval.as_millis() as u64,
            max_poll_attempts,
            "Loaded client config"
        );

        Ok(Self {
            api_base_url,
            auth_token,
            poll_interval,
            max_poll_attempts,
        })
    }
}

fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        }),
        None => Ok(default),
    }
}
