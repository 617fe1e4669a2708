//! Server configuration
//!
//! Loaded through `confy`, which writes a file with these defaults the
//! first time the server starts.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// Main configuration for the planner server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface to listen on
    pub bind_address: String,
    /// TCP port to listen on
    pub port: u16,
    /// Flat file holding the task list
    pub data_file: String,
    /// Size of the single read buffer per request; larger requests are truncated
    pub buffer_size: usize,
    /// Default tracing filter, overridable with RUST_LOG
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            data_file: "tasks.txt".to_string(),
            buffer_size: 4096,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, creating it with defaults when missing
    pub fn load() -> Result<Self> {
        let cfg: Config = confy::load("planner", None)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(ServerError::config("buffer_size must be greater than zero"));
        }
        if self.data_file.trim().is_empty() {
            return Err(ServerError::config("data_file must not be empty"));
        }
        Ok(())
    }

    /// `address:port` string handed to the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Browser URL for the configured port
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.data_file, "tasks.txt");
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.url(), "http://localhost:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = Config {
            buffer_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config { .. })));
    }

    #[test]
    fn test_empty_data_file_rejected() {
        let config = Config {
            data_file: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
