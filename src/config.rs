// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! The base URL is fixed for the lifetime of a client; there is no runtime
//! reconfiguration.

use std::env;
use std::time::Duration;

/// Default base URL of the coach backend API.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the coach API, without a trailing slash
    pub api_base: String,
    /// Optional transport timeout. `None` leaves reqwest's defaults in place.
    pub request_timeout: Option<Duration>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base = env::var("COACH_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let request_timeout = match env::var("COACH_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            api_base: normalize_base(&api_base)?,
            request_timeout,
            user_agent: env::var("COACH_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
        })
    }

    /// Config pointing at an explicit base URL (used by tests and the CLI).
    pub fn with_api_base(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalize_base(api_base)?,
            ..Self::default()
        })
    }
}

fn default_user_agent() -> String {
    format!("coach-client/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            name: "COACH_API_BASE",
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name: "COACH_REQUEST_TIMEOUT_SECS",
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
