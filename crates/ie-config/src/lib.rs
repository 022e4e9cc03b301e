//! Entitlement Resolver Configuration
//!
//! TOML-based configuration with environment variable overrides. Every section
//! has defaults, so an absent file yields a working configuration that talks
//! to real AWS through the standard SDK credential and region chain.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::{ConfigLoader, LoadedConfig, CONFIG_PATH_ENV};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

/// AWS client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Region override; empty uses the SDK default chain
    pub region: String,
    /// Endpoint override (e.g. LocalStack); empty uses the real service endpoints
    pub endpoint_url: String,
}

impl AwsConfig {
    pub fn region(&self) -> Option<&str> {
        non_empty(&self.region)
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        non_empty(&self.endpoint_url)
    }
}

/// Resolver behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How many group principals may be aggregated at once (1 = sequential)
    pub max_concurrent_principals: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_concurrent_principals: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// text or json
    pub format: String,
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            level: "info".to_string(),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override.
    ///
    /// The returned [`LoadedConfig`] carries the load diagnostics; log them
    /// with [`LoadedConfig::log`] once logging is up.
    pub fn load() -> Result<LoadedConfig, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject settings the resolver cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.max_concurrent_principals == 0 {
            return Err(ConfigError::ValidationError(
                "resolver.max_concurrent_principals must be at least 1".to_string(),
            ));
        }

        let format = self.logging.format.trim().to_ascii_lowercase();
        if format != "text" && format != "json" {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Entitlement Resolver Configuration
# Environment variables (ENTITLEMENTS_*) override these settings

[aws]
region = ""        # empty = SDK default chain (AWS_REGION, profile, IMDS)
endpoint_url = ""  # e.g. "http://localhost:4566" for LocalStack

[resolver]
max_concurrent_principals = 1  # 1 = groups are aggregated one at a time

[logging]
format = "text"  # text or json
level = "info"   # used when RUST_LOG is unset
"#
        .to_string()
    }
}
