// Configuration document loaders (tenant directories, settings files)

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

    /// Detect the format of a path from its extension
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ConfigError::LoadError(format!("No file extension on {}", path.display()))
            })?;

        Self::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))
    }
}

/// Parses configuration documents into a JSON value tree.
///
/// Every format is normalized to `serde_json::Value` so typed documents
/// (tenant lists, platform settings) deserialize the same way regardless
/// of where they came from.
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FileFormat::detect(path)?))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load configuration from file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse configuration from string
    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => Self::parse_json(content),
            FileFormat::Toml => Self::parse_toml(content),
            FileFormat::Env => Ok(Self::parse_env(content)),
        }
    }

    /// Parse and deserialize into a typed document
    pub fn parse_as<T: serde::de::DeserializeOwned>(&self, content: &str) -> Result<T> {
        let value = self.parse(content)?;
        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    fn parse_json(content: &str) -> Result<Value> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))
    }

    fn parse_toml(content: &str) -> Result<Value> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        serde_json::to_value(toml_value)
            .map_err(|e| ConfigError::ParseError(format!("TOML to JSON conversion error: {}", e)))
    }

    fn parse_env(content: &str) -> Value {
        let mut map = serde_json::Map::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                map.insert(key, crate::env::coerce(value));
            }
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_tenant_document() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let json = r#"{"tenants": [{"id": "centro-abc", "name": "Centro ABC"}]}"#;

        let result = loader.parse(json).unwrap();
        assert_eq!(result["tenants"][0]["id"], "centro-abc");
    }

    #[test]
    fn test_parse_toml_tables() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            [[tenants]]
            id = "empresa-demo"
            customFeatures = ["Dashboard", "Home"]

            [tenants.modules]
            facturacion = false
        "#;

        let result = loader.parse(toml).unwrap();
        assert_eq!(result["tenants"][0]["customFeatures"][1], "Home");
        assert_eq!(result["tenants"][0]["modules"]["facturacion"], false);
    }

    #[test]
    fn test_parse_env_coerces_values() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            LOGIN_SEGMENT=ingresar
            # Comment
            STRICT_OVERRIDES=true
            SESSION_NAMESPACE="auth"
        "#;

        let result = loader.parse(env).unwrap();
        assert_eq!(result["login_segment"], "ingresar");
        assert_eq!(result["strict_overrides"], true);
        assert_eq!(result["session_namespace"], "auth");
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(
            loader.parse("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_as_typed() {
        #[derive(serde::Deserialize)]
        struct Doc {
            name: String,
        }

        let loader = ConfigLoader::new(FileFormat::Toml);
        let doc: Doc = loader.parse_as(r#"name = "Centro ABC""#).unwrap();
        assert_eq!(doc.name, "Centro ABC");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("env"), Some(FileFormat::Env));
        assert_eq!(FileFormat::from_extension("yaml"), None);

        assert_eq!(
            FileFormat::detect("config/tenants.toml").unwrap(),
            FileFormat::Toml
        );
        assert!(FileFormat::detect("config/tenants").is_err());
    }

    #[test]
    fn test_missing_file() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(
            loader.load_file("/definitely/not/here.json"),
            Err(ConfigError::LoadError(_))
        ));
    }
}
