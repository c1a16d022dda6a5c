//! Error types for the platform pipeline.

use mosaic_auth::AuthError;
use mosaic_config::ConfigError;
use mosaic_features::{CatalogError, FeatureKind, ResolveError};
use mosaic_session::SessionError;
use mosaic_tenancy::TenantError;
use thiserror::Error;

/// Platform errors.
///
/// Request outcomes such as unknown tenants, disabled features and
/// redirects are not errors; they are [`PageOutcome`](crate::PageOutcome)s.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tenant error: {0}")]
    Tenant(#[from] TenantError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Implementation '{implementation}' of '{feature}' does not accept {input} input")]
    InputMismatch {
        feature: String,
        implementation: String,
        input: FeatureKind,
    },

    #[error("Platform is missing {0}")]
    Incomplete(&'static str),
}

impl PlatformError {
    /// HTTP-like status code
    pub fn status(&self) -> u16 {
        match self {
            PlatformError::Resolve(e) => e.status(),
            PlatformError::Tenant(e) if e.is_not_found() => 404,
            PlatformError::Auth(AuthError::LoginNotEnforced(_)) => 404,
            _ => 500,
        }
    }
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
