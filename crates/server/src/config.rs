use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use services::services::paypal_checkout::{PaypalCredentials, SANDBOX_API_BASE};
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings the checkout routes apply to every provider call.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: String,
    pub return_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            return_url: None,
            cancel_url: None,
        }
    }
}

pub struct ServerConfig {
    pub addr: SocketAddr,
    pub paypal: PaypalCredentials,
    pub checkout: CheckoutSettings,
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Read the server configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = match var("HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                key: "HOST",
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let client_id = var("PAYPAL_CLIENT_ID").ok_or(ConfigError::Missing("PAYPAL_CLIENT_ID"))?;
        let client_secret =
            var("PAYPAL_CLIENT_SECRET").ok_or(ConfigError::Missing("PAYPAL_CLIENT_SECRET"))?;
        let api_base = var("PAYPAL_API_BASE").unwrap_or_else(|| SANDBOX_API_BASE.to_string());
        let api_base = Url::parse(&api_base).map_err(|e| ConfigError::Invalid {
            key: "PAYPAL_API_BASE",
            reason: e.to_string(),
        })?;

        let currency = var("PAYPAL_CURRENCY")
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if !is_currency_code(&currency) {
            return Err(ConfigError::Invalid {
                key: "PAYPAL_CURRENCY",
                reason: format!("`{currency}` is not a three letter currency code"),
            });
        }

        Ok(Self {
            addr: SocketAddr::new(host, port),
            paypal: PaypalCredentials {
                client_id,
                client_secret: SecretString::from(client_secret),
                api_base,
            },
            checkout: CheckoutSettings {
                currency,
                return_url: var("PAYPAL_RETURN_URL"),
                cancel_url: var("PAYPAL_CANCEL_URL"),
            },
            sentry_dsn: var("SENTRY_DSN"),
        })
    }
}

pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}
