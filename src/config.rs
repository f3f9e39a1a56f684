//! Configuration Module
//!
//! This module defines all configuration structures for the batch retriever.
//! Configuration is loaded from TOML files and parsed using serde.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs;

/// Environment variable naming the configuration file to load
pub const CONFIG_PATH_ENV: &str = "BATCH_RETRIEVER_CONFIG";

/// Configuration file used when `BATCH_RETRIEVER_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "127.0.0.1"
/// port = 7071
///
/// [orchestrator]
/// base_url = "http://127.0.0.1:8080"
/// run_path = "/run"
/// timeout_ms = 30000
///
/// [logging]
/// level = "info"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 7071)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Orchestration service connection settings
///
/// # Fields
/// - `base_url`: Scheme, host and port of the orchestrator (e.g., "http://orchestrator:8080")
/// - `run_path`: Path of the run operation, appended to `base_url`
/// - `timeout_ms`: Client-side timeout per call; no timeout when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    pub base_url: String,
    #[serde(default = "default_run_path")]
    pub run_path: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl OrchestratorConfig {
    /// Full URL of the run operation
    pub fn run_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.run_path.starts_with('/') {
            format!("{}{}", base, self.run_path)
        } else {
            format!("{}/{}", base, self.run_path)
        }
    }
}

fn default_run_path() -> String {
    "/run".to_string()
}

/// Logging configuration
///
/// `level` is an `EnvFilter` directive; `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded, parsed and validated
    /// * `Err` if the file couldn't be read, the TOML is invalid or a value is unusable
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path))
    }

    /// Load from the path named by `BATCH_RETRIEVER_CONFIG`, or the default path
    pub fn load_from_env() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let base = &self.orchestrator.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("orchestrator.base_url must be an http(s) URL, got {:?}", base);
        }
        reqwest::Url::parse(&self.orchestrator.run_url())
            .with_context(|| format!("orchestrator URL {:?} is not valid", self.orchestrator.run_url()))?;
        if self.orchestrator.timeout_ms == Some(0) {
            bail!("orchestrator.timeout_ms must be greater than zero");
        }
        Ok(())
    }
}
