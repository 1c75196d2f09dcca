// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default location of the SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "trackbuddy.sqlite";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// SQLite database file. `None` keeps the database in memory.
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 3000,
        };

        let database_path = match env::var("DATABASE_PATH") {
            Ok(raw) if raw.trim() == ":memory:" => None,
            Ok(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::Invalid("DATABASE_PATH", raw));
            }
            Ok(raw) => Some(PathBuf::from(raw.trim())),
            Err(_) => Some(PathBuf::from(DEFAULT_DATABASE_PATH)),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
            database_path,
        })
    }

    /// Config for tests: in-memory database, default port.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 3000,
            database_path: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
