//! Configuration loader with file and environment variable support
//!
//! Loading usually happens before logging is initialized, so the loader does
//! not log directly: it collects what it did into a [`LoadedConfig`] and the
//! caller emits that with [`LoadedConfig::log`] once a subscriber exists.

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "entitlements.toml",
    "./config/config.toml",
    "/etc/entitlements/config.toml",
];

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "ENTITLEMENTS_CONFIG";

/// A loaded configuration plus what happened while loading it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
    /// Settings that were ignored and fell back to their defaults
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Emit the load diagnostics. Call after logging is initialized.
    pub fn log(&self) {
        match &self.source {
            Some(path) => info!(?path, "Loaded configuration from file"),
            None => info!("No configuration file found, using defaults"),
        }
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    search_standard_paths: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_path: None,
            search_standard_paths: true,
        }
    }

    /// Create a loader with a specific config file path.
    ///
    /// Unlike the search paths, an explicit path that does not exist is an error.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
            search_standard_paths: false,
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) but reads variables through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let source = self.find_config_file(&lookup, &mut warnings)?;
        let mut config = match &source {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        apply_overrides(&mut config, &lookup, &mut warnings);
        config.validate()?;

        Ok(LoadedConfig {
            config,
            source,
            warnings,
        })
    }

    /// Find the configuration file to use
    fn find_config_file<F>(
        &self,
        lookup: &F,
        warnings: &mut Vec<String>,
    ) -> Result<Option<PathBuf>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Ok(Some(path.clone()));
            }
            return Err(ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )));
        }

        if let Some(path) = lookup(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Some(path));
            }
            warnings.push(format!(
                "{} points to a missing file ({}), ignoring",
                CONFIG_PATH_ENV,
                path.display()
            ));
        }

        if self.search_standard_paths {
            for path in CONFIG_PATHS {
                let path = PathBuf::from(path);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides
fn apply_overrides<F>(config: &mut AppConfig, lookup: &F, warnings: &mut Vec<String>)
where
    F: Fn(&str) -> Option<String>,
{
    // AWS
    if let Some(val) = lookup("ENTITLEMENTS_AWS_REGION") {
        config.aws.region = val;
    }
    if let Some(val) = lookup("ENTITLEMENTS_AWS_ENDPOINT_URL") {
        config.aws.endpoint_url = val;
    }

    // Resolver
    if let Some(val) = lookup("ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS") {
        match val.parse() {
            Ok(limit) => config.resolver.max_concurrent_principals = limit,
            Err(_) => warnings.push(format!(
                "Ignoring unparsable ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS={:?}, keeping {}",
                val, config.resolver.max_concurrent_principals
            )),
        }
    }

    // Logging; the generic LOG_FORMAT is honoured too
    if let Some(val) = lookup("ENTITLEMENTS_LOG_FORMAT").or_else(|| lookup("LOG_FORMAT")) {
        config.logging.format = val;
    }
    if let Some(val) = lookup("ENTITLEMENTS_LOG_LEVEL") {
        config.logging.level = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env_only_loader() -> ConfigLoader {
        ConfigLoader {
            config_path: None,
            search_standard_paths: false,
        }
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let file = write_config(
            r#"
[aws]
region = "eu-central-1"

[resolver]
max_concurrent_principals = 4
"#,
        );

        let loaded = ConfigLoader::with_path(file.path())
            .load_with(|_| None)
            .unwrap();

        assert_eq!(loaded.source.as_deref(), Some(file.path()));
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.config.aws.region(), Some("eu-central-1"));
        assert_eq!(loaded.config.resolver.max_concurrent_principals, 4);
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let result = ConfigLoader::with_path("/nonexistent/entitlements.toml").load_with(|_| None);
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(
            r#"
[aws]
region = "eu-central-1"

[logging]
format = "text"
"#,
        );
        let env = vars(&[
            ("ENTITLEMENTS_AWS_REGION", "us-west-2"),
            ("ENTITLEMENTS_AWS_ENDPOINT_URL", "http://localhost:4566"),
            ("ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS", "8"),
            ("LOG_FORMAT", "json"),
        ]);

        let config = ConfigLoader::with_path(file.path())
            .load_with(|key| env.get(key).cloned())
            .unwrap()
            .config;

        assert_eq!(config.aws.region(), Some("us-west-2"));
        assert_eq!(config.aws.endpoint_url(), Some("http://localhost:4566"));
        assert_eq!(config.resolver.max_concurrent_principals, 8);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_specific_log_format_wins_over_generic() {
        let env = vars(&[("ENTITLEMENTS_LOG_FORMAT", "text"), ("LOG_FORMAT", "json")]);
        let mut config = AppConfig::default();
        let mut warnings = Vec::new();

        apply_overrides(&mut config, &|key: &str| env.get(key).cloned(), &mut warnings);

        assert_eq!(config.logging.format, "text");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_config_env_var_selects_file() {
        let file = write_config("[logging]\nlevel = \"debug\"\n");
        let env = vars(&[(CONFIG_PATH_ENV, file.path().to_str().unwrap())]);

        let loaded = env_only_loader()
            .load_with(|key| env.get(key).cloned())
            .unwrap();

        assert_eq!(loaded.config.logging.level, "debug");
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_missing_config_env_file_is_reported() {
        let env = vars(&[(CONFIG_PATH_ENV, "/bad/path/entitlements.toml")]);

        let loaded = env_only_loader()
            .load_with(|key| env.get(key).cloned())
            .unwrap();

        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.resolver.max_concurrent_principals, 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains(CONFIG_PATH_ENV));
        assert!(loaded.warnings[0].contains("/bad/path/entitlements.toml"));
    }

    #[test]
    fn test_unparsable_override_is_reported() {
        let env = vars(&[("ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS", "many")]);

        let loaded = env_only_loader()
            .load_with(|key| env.get(key).cloned())
            .unwrap();

        assert_eq!(loaded.config.resolver.max_concurrent_principals, 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS"));
        assert!(loaded.warnings[0].contains("many"));
    }

    #[test]
    fn test_zero_concurrency_override_fails_validation() {
        let env = vars(&[("ENTITLEMENTS_MAX_CONCURRENT_PRINCIPALS", "0")]);

        let result = env_only_loader().load_with(|key| env.get(key).cloned());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
