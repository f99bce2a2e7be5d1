//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{net::SocketAddr, time::Duration};

use casino_predictor::chat::{
    ChatConfig,
    client::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL},
};
pub use casino_predictor::game::constants::{DEFAULT_PREDICTION_WINDOW, MAX_PREDICTION_WINDOW};

/// Default HTTP bind address.
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 5000);

pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Capacity of the predictor's rolling windows
    pub prediction_window: usize,
    /// Completion backend configuration
    pub chat: ChatSettings,
    /// Prometheus exporter address; no exporter when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Ollama connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub ollama_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl ChatSettings {
    pub fn to_chat_config(&self) -> ChatConfig {
        ChatConfig {
            base_url: self.ollama_url.trim_end_matches('/').to_string(),
            model: self.model.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Values given on the command line. Each one wins over its environment variable.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub prediction_window: Option<usize>,
    pub ollama_url: Option<String>,
    pub model: Option<String>,
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_env("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let prediction_window = match overrides.prediction_window {
            Some(window) => window,
            None => parse_env("PREDICTION_WINDOW")?.unwrap_or(DEFAULT_PREDICTION_WINDOW),
        };

        let chat = ChatSettings {
            ollama_url: overrides
                .ollama_url
                .or_else(|| std::env::var("OLLAMA_URL").ok())
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: overrides
                .model
                .or_else(|| std::env::var("OLLAMA_MODEL").ok())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs: parse_env_or("CHAT_TIMEOUT_SECS", DEFAULT_CHAT_TIMEOUT_SECS),
        };

        let metrics_bind = match overrides.metrics_bind {
            Some(addr) => Some(addr),
            None => parse_env("METRICS_BIND")?,
        };

        Ok(ServerConfig {
            bind,
            prediction_window,
            chat,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prediction_window == 0 || self.prediction_window > MAX_PREDICTION_WINDOW {
            return Err(ConfigError::Invalid {
                var: "PREDICTION_WINDOW".to_string(),
                reason: format!("Must be between 1 and {MAX_PREDICTION_WINDOW}"),
            });
        }

        if self.chat.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "CHAT_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !self.chat.ollama_url.starts_with("http://")
            && !self.chat.ollama_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid {
                var: "OLLAMA_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if self.chat.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "OLLAMA_MODEL".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not parse environment variable {var}={value:?}")]
    Unparsable { var: String, value: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parses `key` when it is set, failing loudly on garbage.
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Unparsable {
                var: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ServerConfig {
        ServerConfig {
            bind: DEFAULT_BIND,
            prediction_window: DEFAULT_PREDICTION_WINDOW,
            chat: ChatSettings {
                ollama_url: DEFAULT_OLLAMA_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
            },
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Unparsable {
            var: "SERVER_BIND".to_string(),
            value: "nowhere".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SERVER_BIND"));
        assert!(msg.contains("nowhere"));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = valid_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind.to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_overrides_win() {
        let config = ServerConfig::from_env(Overrides {
            bind: Some("0.0.0.0:8080".parse().unwrap()),
            prediction_window: Some(42),
            ollama_url: Some("http://ollama:11434/".to_string()),
            model: Some("llama3".to_string()),
            metrics_bind: Some("0.0.0.0:9090".parse().unwrap()),
        })
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.prediction_window, 42);
        assert_eq!(config.chat.model, "llama3");
        assert_eq!(config.chat.to_chat_config().base_url, "http://ollama:11434");
        assert_eq!(config.metrics_bind.map(|a| a.port()), Some(9090));
    }

    #[test]
    fn test_config_validation_window_zero() {
        let config = ServerConfig {
            prediction_window: 0,
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "PREDICTION_WINDOW"));
    }

    #[test]
    fn test_config_validation_window_too_large() {
        let config = ServerConfig {
            prediction_window: MAX_PREDICTION_WINDOW + 1,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_chat_settings() {
        let mut config = valid_config();
        config.chat.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.chat.ollama_url = "localhost:11434".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.chat.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_metrics_collision() {
        let config = ServerConfig {
            metrics_bind: Some(DEFAULT_BIND),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }
}
