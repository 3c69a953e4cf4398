//! Configuration for the formgate validation pipeline.
//!
//! [`PipelineConfig`] can be built in code, read from `FORMGATE_*`
//! environment variables (optionally seeded from a `.env` file), or loaded
//! from a JSON, TOML or env file.
//!
//! ```rust
//! use formgate_config::PipelineConfig;
//!
//! let config = PipelineConfig::new()
//!     .with_max_body_size_kb(64)
//!     .with_allow_empty_body(true);
//!
//! assert_eq!(config.max_body_size, 64 * 1024);
//! ```
//!
//! # Environment Variables
//!
//! - `FORMGATE_MAX_BODY_SIZE` - Maximum request body size in bytes
//! - `FORMGATE_ALLOW_EMPTY_BODY=1|0|true|false` - Decode an empty body as `{}`

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Common size constants for convenience
pub mod sizes {
    /// 1 Kilobyte
    pub const KB: usize = 1024;
    /// 1 Megabyte
    pub const MB: usize = 1024 * 1024;
    /// 1 Gigabyte
    pub const GB: usize = 1024 * 1024 * 1024;
}

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FORMGATE";

/// Default body limit: 1MB
pub const DEFAULT_MAX_BODY_SIZE: usize = sizes::MB;

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Decode an empty body as an empty JSON object instead of failing
    pub allow_empty_body: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            allow_empty_body: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with a 1MB body limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body limit in bytes.
    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Sets the body limit in kilobytes.
    pub fn with_max_body_size_kb(mut self, kb: usize) -> Self {
        self.max_body_size = kb.saturating_mul(sizes::KB);
        self
    }

    /// Sets the body limit in megabytes.
    pub fn with_max_body_size_mb(mut self, mb: usize) -> Self {
        self.max_body_size = mb.saturating_mul(sizes::MB);
        self
    }

    pub fn with_allow_empty_body(mut self, allow: bool) -> Self {
        self.allow_empty_body = allow;
        self
    }

    /// Load from `FORMGATE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_prefixed(ENV_PREFIX)
    }

    /// Load from environment variables under a custom prefix.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self> {
        Self::from_vars(&EnvLoader::with_prefix(prefix).load())
    }

    /// Load `.env` into the process environment, then read `FORMGATE_*`.
    ///
    /// Without a path a missing `.env` is ignored.
    pub fn load_dotenv(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok();
        }
        Self::from_env()
    }

    /// Build from normalized (prefix-stripped, lower-case) string pairs.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = vars.get("max_body_size") {
            config.max_body_size = value.trim().parse().map_err(|_| {
                ConfigError::ParseError(format!("max_body_size: invalid size '{}'", value))
            })?;
        }

        if let Some(value) = vars.get("allow_empty_body") {
            config.allow_empty_body = parse_flag(value).ok_or_else(|| {
                ConfigError::ParseError(format!("allow_empty_body: invalid flag '{}'", value))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON, TOML or env file, detected by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let data = loader.load_file(path)?;
        Self::from_value(loader.format(), data)
    }

    /// Parse from file contents in the given format.
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        let data = ConfigLoader::new(format).parse(content)?;
        Self::from_value(format, data)
    }

    fn from_value(format: FileFormat, data: serde_json::Value) -> Result<Self> {
        if format == FileFormat::Env {
            let serde_json::Value::Object(map) = data else {
                return Ok(Self::default());
            };
            let pairs = map
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k, v.to_string())));
            return Self::from_vars(&EnvLoader::with_prefix(ENV_PREFIX).collect(pairs));
        }

        let config: Self = serde_json::from_value(data)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::in_range(self.max_body_size, 1, sizes::GB, "max_body_size")
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(items: &[(&str, &str)]) -> HashMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert!(!config.allow_empty_body);
    }

    #[test]
    fn test_builder_units() {
        assert_eq!(PipelineConfig::new().with_max_body_size(10).max_body_size, 10);
        assert_eq!(
            PipelineConfig::new().with_max_body_size_kb(2).max_body_size,
            2048
        );
        assert_eq!(
            PipelineConfig::new().with_max_body_size_mb(3).max_body_size,
            3 * 1024 * 1024
        );
    }

    #[test]
    fn test_builder_units_saturate() {
        let config = PipelineConfig::new().with_max_body_size_mb(usize::MAX);
        assert_eq!(config.max_body_size, usize::MAX);
        assert!(config.validate().is_err());

        let config = PipelineConfig::new().with_max_body_size_kb(usize::MAX / 2);
        assert_eq!(config.max_body_size, usize::MAX);
    }

    #[test]
    fn test_from_vars() {
        let config = PipelineConfig::from_vars(&vars(&[
            ("max_body_size", "2048"),
            ("allow_empty_body", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.max_body_size, 2048);
        assert!(config.allow_empty_body);
    }

    #[test]
    fn test_from_vars_invalid_values() {
        assert!(matches!(
            PipelineConfig::from_vars(&vars(&[("max_body_size", "lots")])),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            PipelineConfig::from_vars(&vars(&[("allow_empty_body", "maybe")])),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(matches!(
            PipelineConfig::from_vars(&vars(&[("max_body_size", "0")])),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(PipelineConfig::new().with_max_body_size(0).validate().is_err());
    }

    #[test]
    fn test_from_env_with_unset_prefix() {
        let config = PipelineConfig::from_env_prefixed("FORMGATE_TEST_UNSET_3K8").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_parse_toml_partial() {
        let config = PipelineConfig::parse("allow_empty_body = true", FileFormat::Toml).unwrap();
        assert!(config.allow_empty_body);
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_parse_json_wrong_type() {
        let result = PipelineConfig::parse(r#"{"max_body_size": "big"}"#, FileFormat::Json);
        assert!(matches!(result, Err(ConfigError::DeserializationError(_))));
    }

    #[test]
    fn test_parse_env_file() {
        let content = "FORMGATE_MAX_BODY_SIZE=512\nOTHER=1\n";
        let config = PipelineConfig::parse(content, FileFormat::Env).unwrap();
        assert_eq!(config.max_body_size, 512);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("2"), None);
    }
}
