// Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }
}

/// Configuration file loader
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Auto-detect format from file extension
    pub fn auto(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    /// Load configuration from file
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("Failed to read file: {}", e)))?;

        self.parse(&content)
    }

    /// Parse configuration from string
    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => self.parse_json(content),
            FileFormat::Toml => self.parse_toml(content),
            FileFormat::Env => Ok(self.parse_env(content)),
        }
    }

    fn parse_json(&self, content: &str) -> Result<Value> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))
    }

    fn parse_toml(&self, content: &str) -> Result<Value> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        serde_json::to_value(toml_value).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    // Every value stays a string; typed conversion happens per key.
    fn parse_env(&self, content: &str) -> Value {
        let mut map = serde_json::Map::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                map.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let result = loader.parse(r#"{"max_body_size": 42}"#).unwrap();
        assert_eq!(result["max_body_size"], 42);
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            max_body_size = 4096
            allow_empty_body = true
        "#;

        let result = loader.parse(toml).unwrap();
        assert_eq!(result["max_body_size"], 4096);
        assert_eq!(result["allow_empty_body"], true);
    }

    #[test]
    fn test_parse_env() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            FORMGATE_MAX_BODY_SIZE=42
            # Comment
            QUOTED="quoted value"
        "#;

        let result = loader.parse(env).unwrap();
        assert_eq!(result["FORMGATE_MAX_BODY_SIZE"], "42");
        assert_eq!(result["QUOTED"], "quoted value");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ConfigLoader::new(FileFormat::Json).parse("{not json"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ConfigLoader::new(FileFormat::Toml).parse("= nope"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("env"), Some(FileFormat::Env));
        assert_eq!(FileFormat::from_extension("yaml"), None);
    }

    #[test]
    fn test_auto_detection() {
        let loader = ConfigLoader::auto(Path::new("formgate.toml")).unwrap();
        assert_eq!(loader.format(), FileFormat::Toml);

        assert!(ConfigLoader::auto(Path::new("formgate")).is_err());
        assert!(ConfigLoader::auto(Path::new("formgate.ini")).is_err());
    }
}
