//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub server_host: String,
    /// HTTP + WebSocket server port
    pub server_port: u16,

    /// Shared secret for HS256 credential verification
    pub jwt_secret: String,

    /// JSON file holding the user directory records
    pub user_directory_path: PathBuf,

    /// Upper bound on credential resolution (verification + directory lookup)
    pub auth_resolve_timeout: Duration,

    /// Outbound message buffer per connection; a full buffer drops deliveries
    pub connection_channel_buffer: usize,

    /// CORS allowed origins (comma-separated, or "*" for any); empty disables CORS
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| "9090".to_string())
            .parse()
            .context("SERVER_PORT must be a valid port number")?;

        let auth_timeout_ms: u64 = lookup("AUTH_RESOLVE_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .context("AUTH_RESOLVE_TIMEOUT_MS must be a number of milliseconds")?;

        let connection_channel_buffer: usize = lookup("CONNECTION_CHANNEL_BUFFER")
            .unwrap_or_else(|| "256".to_string())
            .parse()
            .context("CONNECTION_CHANNEL_BUFFER must be a positive integer")?;
        if connection_channel_buffer == 0 {
            anyhow::bail!("CONNECTION_CHANNEL_BUFFER must be greater than zero");
        }

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,

            jwt_secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .context("JWT_SECRET environment variable is required")?,

            user_directory_path: lookup("USER_DIRECTORY_PATH")
                .unwrap_or_else(|| "./data/users.json".to_string())
                .into(),

            auth_resolve_timeout: Duration::from_millis(auth_timeout_ms),
            connection_channel_buffer,

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}
