//! Process configuration, read from environment variables.
//!
//! | variable | default |
//! |----------|---------|
//! | `STOCKDESK_BIND_ADDR` | `0.0.0.0:8080` |
//! | `JWT_SECRET` | `dev-secret` (insecure) |
//! | `STOCKDESK_SEED_FILE` | none |
//! | `STOCKDESK_LOG_FORMAT` | `json` |
//! | `STOCKDESK_INVOICE_DUE_DAYS` | `30` |
//! | `STOCKDESK_AUTOCOMPLETE_LIMIT` | `20` |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use stockdesk_inventory::SUGGESTION_LIMIT;
use stockdesk_observability::LogFormat;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
    pub invoice_due_days: u32,
    pub autocomplete_limit: usize,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset and blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("STOCKDESK_BIND_ADDR") {
            Some(v) => parse("STOCKDESK_BIND_ADDR", &v)?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let log_format = match get("STOCKDESK_LOG_FORMAT") {
            Some(v) => v.parse::<LogFormat>().map_err(|reason| ConfigError::Invalid {
                var: "STOCKDESK_LOG_FORMAT",
                value: v.clone(),
                reason,
            })?,
            None => LogFormat::default(),
        };

        let invoice_due_days = match get("STOCKDESK_INVOICE_DUE_DAYS") {
            Some(v) => parse("STOCKDESK_INVOICE_DUE_DAYS", &v)?,
            None => 30,
        };

        let autocomplete_limit = match get("STOCKDESK_AUTOCOMPLETE_LIMIT") {
            Some(v) => parse::<usize>("STOCKDESK_AUTOCOMPLETE_LIMIT", &v)?.min(SUGGESTION_LIMIT),
            None => SUGGESTION_LIMIT,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            seed_file: get("STOCKDESK_SEED_FILE").map(PathBuf::from),
            log_format,
            invoice_due_days,
            autocomplete_limit,
        })
    }

    /// True when `JWT_SECRET` was not provided.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
