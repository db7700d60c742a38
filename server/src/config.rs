//! Configuration management for the server.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Accepted access tokens. `None` accepts any non-empty bearer token.
    pub access_tokens: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let access_tokens = env::var("ACCESS_TOKENS")
            .ok()
            .map(|raw| parse_token_list(&raw))
            .transpose()?;

        Ok(Self {
            host,
            port,
            access_tokens,
        })
    }

    /// Configuration accepting any token, for tests and local development.
    pub fn open(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            access_tokens: None,
        }
    }

    /// Whether a bearer token is accepted.
    pub fn accepts_token(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        match &self.access_tokens {
            Some(tokens) => tokens.iter().any(|t| t == token),
            None => true,
        }
    }
}

fn parse_token_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let tokens: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.is_empty() {
        return Err(ConfigError::EmptyTokenList);
    }
    Ok(tokens)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("ACCESS_TOKENS is set but lists no tokens")]
    EmptyTokenList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_list_parsing() {
        let tokens = parse_token_list(" alpha, beta ,,gamma ").unwrap();
        assert_eq!(tokens, vec!["alpha", "beta", "gamma"]);

        assert!(matches!(
            parse_token_list(" , "),
            Err(ConfigError::EmptyTokenList)
        ));
    }

    #[test]
    fn open_config_accepts_any_non_empty_token() {
        let config = Config::open("127.0.0.1", 0);
        assert!(config.accepts_token("anything"));
        assert!(!config.accepts_token(""));
    }

    #[test]
    fn allow_list_restricts_tokens() {
        let config = Config {
            access_tokens: Some(vec!["alpha".to_string()]),
            ..Config::open("127.0.0.1", 0)
        };
        assert!(config.accepts_token("alpha"));
        assert!(!config.accepts_token("beta"));
    }
}
