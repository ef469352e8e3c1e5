use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_host: String,
    pub bucket: String,
    pub scope: String,
    pub collection: String,
    pub db_username: String,
    pub password: String,
    pub audit_log_dir: String,
}

impl Config {
    /// Reads the environment once at startup. Missing required variables fail
    /// here, before any connection attempt.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            db_host: required("DB_HOST")?,
            bucket: required("BUCKET")?,
            scope: required("SCOPE")?,
            collection: required("COLLECTION")?,
            db_username: required("DB_USERNAME")?,
            password: required("PASSWORD")?,
            audit_log_dir: try_load("AUDIT_LOG_DIR", "./logs")?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })
}
