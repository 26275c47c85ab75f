//! Server configuration for `stream2graph-server`.
//!
//! Loads and parses `stream2graph-server.toml`, holding the listen
//! address plus the two tunable subsystems: wait-k defaults and realtime
//! evaluation thresholds.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluator::EvalThresholds;
use crate::waitk::WaitKConfig;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Complete server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Default wait-k bounds for newly created sessions.
    #[serde(default)]
    pub wait_k: WaitKConfig,
    /// Default thresholds for `/api/pipeline/evaluate`.
    #[serde(default)]
    pub eval_thresholds: EvalThresholds,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            wait_k: WaitKConfig::default(),
            eval_thresholds: EvalThresholds::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ServerConfigError> {
        toml::from_str(content).map_err(ServerConfigError::ParseError)
    }

    /// Load from `CONFIG_PATH`, a handful of conventional locations, or
    /// fall back to built-in defaults if none exist.
    pub fn load() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/stream2graph-server.toml"),
            PathBuf::from("../config/stream2graph-server.toml"),
            PathBuf::from("./stream2graph-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_bind_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.wait_k.base_wait_k, 2);
    }

    #[test]
    fn parses_partial_toml_with_defaults_filled_in() {
        let toml_content = r#"
bind_addr = "127.0.0.1:9000"

[wait_k]
min_wait_k = 1
base_wait_k = 3
max_wait_k = 5
"#;
        let config = ServerConfig::from_str(toml_content).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.wait_k.base_wait_k, 3);
        assert_eq!(config.eval_thresholds.latency_p95_threshold_ms, 2000.0);
    }

    #[test]
    fn missing_file_and_env_falls_back_to_defaults() {
        std::env::remove_var("CONFIG_PATH");
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.bind_addr, default_bind_addr());
    }
}
