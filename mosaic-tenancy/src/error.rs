//! Tenant errors

use mosaic_config::ConfigError;

/// Tenant lookup and configuration errors
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Tenant not found: {0}")]
    NotFound(String),

    #[error("Invalid tenant configuration: {0}")]
    Invalid(String),

    #[error("Duplicate tenant identifier: {0}")]
    Duplicate(String),

    #[error("Tenant resolution failed: {0}")]
    ResolutionFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TenantError {
    /// Whether this is the terminal "unknown tenant" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, TenantError::NotFound(_))
    }
}
