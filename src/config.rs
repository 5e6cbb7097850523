//! Runtime configuration from environment variables (optionally seeded from `.env`).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_API_KEY: &str = "secret123";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./students_courses.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Header carrying the API key on every protected route.
pub const API_KEY_HEADER: &str = "X-API-KEY";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
}

impl Config {
    /// Read `API_KEY`, `DATABASE_URL`, `BIND_ADDR`, `MAX_CONNECTIONS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config from an arbitrary variable source. Unset variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.into());
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }

        let database_url = normalize_database_url(
            &lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
        )?;

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            name: "BIND_ADDR",
            reason: format!("{}: {}", bind_raw, e),
        })?;

        let max_connections = match lookup("MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(s) => match s.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "MAX_CONNECTIONS",
                        reason: format!("expected a positive integer, got '{}'", s),
                    })
                }
            },
        };

        Ok(Config {
            api_key,
            database_url,
            bind_addr,
            max_connections,
        })
    }
}

/// Accepts sqlx-style (`sqlite://file.db`, `sqlite:file.db`, `sqlite::memory:`) and
/// SQLAlchemy-style (`sqlite:///rel.db`, `sqlite:////abs.db`) URLs; returns a sqlx URL.
pub fn normalize_database_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    if !url.starts_with("sqlite:") {
        return Err(ConfigError::Invalid {
            name: "DATABASE_URL",
            reason: format!("only sqlite URLs are supported, got '{}'", url),
        });
    }
    if let Some(abs) = url.strip_prefix("sqlite:////") {
        return Ok(format!("sqlite:///{}", abs));
    }
    if let Some(rel) = url.strip_prefix("sqlite:///") {
        return Ok(format!("sqlite://{}", rel));
    }
    Ok(url.to_string())
}
