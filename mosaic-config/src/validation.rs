// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable validation rules for platform configuration
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate an identifier slug: lowercase ASCII letters, digits and `-`,
    /// not starting or ending with `-`.
    pub fn is_slug(value: &str, field: &str) -> Result<()> {
        Self::not_empty(value, field)?;

        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_chars || value.starts_with('-') || value.ends_with('-') {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a lowercase slug (a-z, 0-9, '-'), got '{}'",
                field, value
            )));
        }
        Ok(())
    }

    /// Validate a single URL path segment (no slashes, no whitespace)
    pub fn is_path_segment(value: &str, field: &str) -> Result<()> {
        Self::not_empty(value, field)?;

        if value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a single path segment, got '{}'",
                field, value
            )));
        }
        Ok(())
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of<T: PartialEq + std::fmt::Debug>(
        value: &T,
        allowed: &[T],
        field: &str,
    ) -> Result<()> {
        if !allowed.contains(value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of {:?}",
                field, allowed
            )));
        }
        Ok(())
    }
}
