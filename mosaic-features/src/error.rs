//! Error types for catalog building and feature resolution.

use thiserror::Error;

/// Catalog registration and startup validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Override registered for a feature with no default
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Feature registered twice
    #[error("Duplicate feature: {0}")]
    DuplicateFeature(String),

    /// Second override for the same (tenant, feature) pair
    #[error("Duplicate override of '{feature}' for tenant '{tenant}'")]
    DuplicateOverride { tenant: String, feature: String },

    /// Tenant allow-lists a feature the catalog does not know
    #[error("Tenant '{tenant}' allow-lists unknown feature '{feature}'")]
    UndeclaredCustomFeature { tenant: String, feature: String },

    /// Allow-listed override with nothing registered (strict mode only)
    #[error("Tenant '{tenant}' allow-lists '{feature}' but no override is registered")]
    MissingOverride { tenant: String, feature: String },
}

/// An allow-listed override could not be obtained.
///
/// Recoverable: the resolver falls back to the default implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Override of '{feature}' for tenant '{tenant}' failed to load: {reason}")]
pub struct OverrideLoadFailed {
    /// Tenant the override was requested for
    pub tenant: String,
    /// Feature name
    pub feature: String,
    /// Loader-supplied cause
    pub reason: String,
}

impl OverrideLoadFailed {
    /// Create a load failure
    pub fn new(
        tenant: impl Into<String>,
        feature: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}

/// How a resolution failure surfaces to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Not-found page
    NotFound,
    /// Dedicated disabled-state message
    Disabled,
    /// Internal error page
    InternalError,
}

/// Resolution failures, checked in this order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Tenant is not in the directory
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    /// Tenant switched the feature off
    #[error("Feature '{feature}' is disabled for tenant '{tenant}'")]
    FeatureDisabled { tenant: String, feature: String },

    /// No default implementation; the catalog is misconfigured
    #[error("No default implementation registered for feature '{0}'")]
    FeatureNotFound(String),
}

impl ResolveError {
    /// HTTP-like status code
    pub fn status(&self) -> u16 {
        match self {
            ResolveError::TenantNotFound(_) | ResolveError::FeatureDisabled { .. } => 404,
            ResolveError::FeatureNotFound(_) => 500,
        }
    }

    /// User-visible outcome
    pub fn disposition(&self) -> Disposition {
        match self {
            ResolveError::TenantNotFound(_) => Disposition::NotFound,
            ResolveError::FeatureDisabled { .. } => Disposition::Disabled,
            ResolveError::FeatureNotFound(_) => Disposition::InternalError,
        }
    }

    /// Whether the error points at a configuration bug rather than request data
    pub fn is_internal(&self) -> bool {
        matches!(self, ResolveError::FeatureNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ResolveError::TenantNotFound("x".into()).status(), 404);
        assert_eq!(
            ResolveError::FeatureDisabled {
                tenant: "empresa-demo".into(),
                feature: "Facturacion".into()
            }
            .disposition(),
            Disposition::Disabled
        );
        let missing = ResolveError::FeatureNotFound("Reportes".into());
        assert_eq!(missing.status(), 500);
        assert!(missing.is_internal());
    }

    #[test]
    fn test_display() {
        let failure = OverrideLoadFailed::new("empresa-demo", "Home", "asset missing");
        assert_eq!(
            failure.to_string(),
            "Override of 'Home' for tenant 'empresa-demo' failed to load: asset missing"
        );
    }
}
