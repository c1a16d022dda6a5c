// Environment variable loading

use crate::{ConfigError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::env;

/// Default prefix for platform environment variables
pub const DEFAULT_PREFIX: &str = "MOSAIC";

/// Environment variable loader
///
/// With a prefix, `MOSAIC_LOGIN_SEGMENT` is exposed as `login_segment`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Loader for the `MOSAIC_` namespace
    pub fn platform() -> Self {
        Self::new(Some(DEFAULT_PREFIX.to_string()))
    }

    /// Load matching environment variables
    pub fn load(&self) -> HashMap<String, String> {
        self.collect(env::vars())
    }

    fn collect(&self, vars: impl Iterator<Item = (String, String)>) -> HashMap<String, String> {
        let mut config = HashMap::new();

        for (key, value) in vars {
            match self.prefix {
                Some(ref prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str())
                        && let Some(trimmed) = rest.strip_prefix('_')
                        && !trimmed.is_empty()
                    {
                        config.insert(trimmed.to_lowercase(), value);
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value);
                }
            }
        }

        config
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.full_key(key)).map_err(ConfigError::EnvError)
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::platform()
    }
}

/// Turn a raw string setting into a typed JSON value.
///
/// `true`/`false` become booleans and integers become numbers; everything
/// else stays a string.
pub fn coerce(raw: &str) -> Value {
    match raw.to_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }

    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe in edition 2024, so prefix handling is
    // exercised through `collect` with synthetic variables.

    fn vars(pairs: &[(&str, &str)]) -> impl Iterator<Item = (String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_prefix_is_stripped_and_lowercased() {
        let loader = EnvLoader::platform();
        let loaded = loader.collect(vars(&[
            ("MOSAIC_LOGIN_SEGMENT", "login"),
            ("MOSAIC_STRICT_OVERRIDES", "true"),
            ("PATH", "/usr/bin"),
            ("MOSAICX_OTHER", "ignored"),
            ("MOSAIC_", "ignored"),
        ]));

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("login_segment"), Some(&"login".to_string()));
        assert_eq!(loaded.get("strict_overrides"), Some(&"true".to_string()));
    }

    #[test]
    fn test_no_prefix_keeps_everything() {
        let loader = EnvLoader::new(None);
        let loaded = loader.collect(vars(&[("HOME", "/root"), ("TERM", "xterm")]));
        assert_eq!(loaded.get("home"), Some(&"/root".to_string()));
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_full_key() {
        assert_eq!(
            EnvLoader::platform().full_key("tenants_file"),
            "MOSAIC_TENANTS_FILE"
        );
        assert_eq!(EnvLoader::new(None).full_key("path"), "PATH");
    }

    #[test]
    fn test_missing_var_uses_default() {
        let loader = EnvLoader::platform();
        assert!(loader.load_var("NONEXISTENT_SETTING_4821").is_err());
        assert_eq!(
            loader.load_var_or("NONEXISTENT_SETTING_4821", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("TRUE"), Value::Bool(true));
        assert_eq!(coerce("false"), Value::Bool(false));
        assert_eq!(coerce("42"), Value::from(42));
        assert_eq!(coerce("empresa-demo"), Value::String("empresa-demo".into()));
    }
}
