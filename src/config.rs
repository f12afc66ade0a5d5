use std::env;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Configuration - environment variables, optionally seeded from `.env`
// ============================================================================
//
// SERVER_HOST            (default 0.0.0.0)
// SERVER_PORT            (default 8080)
// DATABASE_URL           (default sqlite://data/store.db)
// DB_MAX_CONNECTIONS     (default 5)
// REQUEST_TIMEOUT_SECS   (default 15)  deadline for each store call
// SHUTDOWN_TIMEOUT_SECS  (default 30)
//
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub shutdown_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parsed(&lookup, "SERVER_PORT", 8080u16)?;

        let url = lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://data/store.db".to_string());
        let max_connections = parsed(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let request_timeout = seconds(&lookup, "REQUEST_TIMEOUT_SECS", 15)?;
        let shutdown_timeout = seconds(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?;

        Ok(Self {
            server: ServerSettings { host, port },
            database: DatabaseSettings {
                url,
                max_connections,
                request_timeout,
            },
            shutdown_timeout,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn seconds<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parsed(lookup, key, default)?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: "0".to_string(),
            reason: "must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
