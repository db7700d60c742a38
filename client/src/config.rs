//! Configuration management for the client.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the local answer file.
pub const DEFAULT_STORE_PATH: &str = "answers.json";

/// Default timeout for a single gateway request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the answer server
    pub server_url: String,
    /// Access token for the signed-in account, if any
    pub access_token: Option<String>,
    /// Path of the local answer file
    pub store_path: PathBuf,
    /// Timeout applied to every gateway request
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the server URL.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            access_token: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            env::var("ANSWER_SERVER_URL").map_err(|_| ConfigError::MissingServerUrl)?;
        if server_url.trim().is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }

        let access_token = env::var("ANSWER_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let store_path = env::var("ANSWER_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        let request_timeout = match env::var("ANSWER_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            server_url,
            access_token,
            store_path,
            request_timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ANSWER_SERVER_URL environment variable is required")]
    MissingServerUrl,

    #[error("Invalid ANSWER_REQUEST_TIMEOUT_SECS value: {0}")]
    InvalidTimeout(String),
}
