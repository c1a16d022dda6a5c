//! Platform settings.
//!
//! Layering, lowest to highest precedence: built-in defaults, an optional
//! settings file, then `MOSAIC_*` environment variables.

use crate::{ConfigError, ConfigManager, ConfigValidator, FileFormat, Result, Validate};
use serde::{Deserialize, Serialize};

/// Settings consumed by the platform pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// JSON or TOML file holding the tenant directory
    pub tenants_file: Option<String>,
    /// Route segment that marks an authentication entry point
    pub login_segment: String,
    /// Prefix of persisted session marker keys
    pub session_namespace: String,
    /// Treat allow-listed overrides without a registered implementation as
    /// startup errors instead of runtime fallbacks
    pub strict_overrides: bool,
    /// Memoize successful resolutions per (tenant, feature)
    pub memoize: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            tenants_file: None,
            login_segment: "login".to_string(),
            session_namespace: "auth".to_string(),
            strict_overrides: false,
            memoize: true,
        }
    }
}

impl Validate for PlatformSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_path_segment(&self.login_segment, "login_segment")?;
        ConfigValidator::is_slug(&self.session_namespace, "session_namespace")?;
        if let Some(ref path) = self.tenants_file {
            ConfigValidator::not_empty(path, "tenants_file")?;
            FileFormat::detect(path)?;
        }
        Ok(())
    }
}

impl PlatformSettings {
    /// Builder for layered loading
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Defaults overlaid with `MOSAIC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().load_env().build()
    }
}

/// Builder for [`PlatformSettings`]
pub struct SettingsBuilder {
    manager: ConfigManager,
    load_env: bool,
    load_dotenv: bool,
    dotenv_path: Option<String>,
    files: Vec<String>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            manager: ConfigManager::platform(),
            load_env: false,
            load_dotenv: false,
            dotenv_path: None,
            files: Vec::new(),
        }
    }

    /// Apply `MOSAIC_*` environment variables
    pub fn load_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Read a `.env` file into the process environment first
    pub fn load_dotenv(mut self, path: Option<String>) -> Self {
        self.load_dotenv = true;
        self.dotenv_path = path;
        self
    }

    /// Add a settings file (format detected from the extension)
    pub fn add_file(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Set a single value explicitly, overriding files loaded so far
    pub fn set<T: Serialize>(self, key: &str, value: T) -> Result<Self> {
        self.manager.set(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<PlatformSettings> {
        let defaults = serde_json::to_value(PlatformSettings::default())
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        let base = ConfigManager::platform();
        base.merge_value(defaults);

        for path in &self.files {
            base.load_file(path, FileFormat::detect(path)?)?;
        }
        base.merge(&self.manager);

        if self.load_dotenv {
            base.load_dotenv(self.dotenv_path.as_deref())?;
        } else if self.load_env {
            base.load_env();
        }

        base.load_validated()
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = PlatformSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.login_segment, "login");
        assert_eq!(settings.session_namespace, "auth");
        assert!(settings.memoize);
        assert!(!settings.strict_overrides);
    }

    #[test]
    fn test_builder_defaults() {
        let settings = PlatformSettings::builder().build().unwrap();
        assert_eq!(settings, PlatformSettings::default());
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let settings = PlatformSettings::builder()
            .set("strict_overrides", true)
            .unwrap()
            .set("login_segment", "ingresar")
            .unwrap()
            .build()
            .unwrap();

        assert!(settings.strict_overrides);
        assert_eq!(settings.login_segment, "ingresar");
        assert_eq!(settings.session_namespace, "auth");
    }

    #[test]
    fn test_invalid_login_segment_rejected() {
        let result = PlatformSettings::builder()
            .set("login_segment", "auth/login")
            .unwrap()
            .build();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_tenants_file_needs_known_format() {
        let settings = PlatformSettings {
            tenants_file: Some("tenants.yaml".to_string()),
            ..PlatformSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
