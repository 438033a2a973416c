//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub internal: InternalServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Internal service (App B) configuration.
///
/// The base URL is resolved once at process start and never mutated; the
/// `APP_B_URL` environment variable overrides it for compatibility with the
/// existing deployment manifests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InternalServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_diagnostic_path")]
    pub diagnostic_path: String,
    /// Timeout for the single comparator call on `/call-b`
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
    /// Timeout for each probe attempt on `/test-load-balancing`
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Probe fan-out; kept at 20 so runs are comparable across deployments
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,
    /// Replica count the operator expects to see; reported but never used
    /// in the load-balancing verdict
    #[serde(default = "default_expected_pods")]
    pub expected_pods: u32,
}

fn default_base_url() -> String {
    "http://test-header-b:8080".to_string()
}

fn default_diagnostic_path() -> String {
    "/diagnostic".to_string()
}

fn default_call_timeout() -> u64 {
    60
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_probe_attempts() -> u32 {
    20
}

fn default_expected_pods() -> u32 {
    2
}

impl Default for InternalServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            diagnostic_path: default_diagnostic_path(),
            call_timeout_secs: default_call_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            probe_attempts: default_probe_attempts(),
            expected_pods: default_expected_pods(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("internal.base_url", default_base_url())?
            .set_default("internal.diagnostic_path", "/diagnostic")?
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with CHAIN_TRACER_)
            .add_source(
                Environment::with_prefix("CHAIN_TRACER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        // Legacy override used by the existing container manifests
        if let Ok(url) = std::env::var("APP_B_URL") {
            if !url.is_empty() {
                settings.internal.base_url = url;
            }
        }

        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.internal.base_url.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Internal service base URL cannot be empty".to_string(),
            )));
        }

        if self.internal.probe_attempts == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Probe attempt count cannot be 0".to_string(),
            )));
        }

        Ok(())
    }

    /// URL of the internal diagnostic endpoint, without query parameters
    pub fn diagnostic_url(&self) -> String {
        format!(
            "{}{}",
            self.internal.base_url.trim_end_matches('/'),
            self.internal.diagnostic_path
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            internal: InternalServiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
