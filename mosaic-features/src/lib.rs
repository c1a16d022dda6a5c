//! Feature Resolution for Mosaic
//!
//! Decides which implementation of a feature renders for a tenant: the
//! shared default, or a tenant-specific override the tenant has
//! explicitly allow-listed.
//!
//! # Features
//!
//! - 📚 **Feature Catalog** - One default per feature, optional per-tenant overrides
//! - ⏳ **Deferred Overrides** - Loaders that may suspend and may fail
//! - 🧭 **Strict Resolution Order** - Tenant, enablement, override, default
//! - 🛟 **Fail-open Fallback** - A broken override never breaks the page
//! - ⚡ **Memoization** - Concurrent (tenant, feature) result cache
//! - ✅ **Startup Validation** - Allow-lists checked against the catalog
//!
//! # Quick Start
//!
//! ```
//! use mosaic_features::*;
//! use mosaic_tenancy::{TenantConfig, TenantDirectory};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let directory = TenantDirectory::new([
//!     TenantConfig::new("centro-abc", "Centro ABC").with_module("facturacion", true),
//! ])
//! .unwrap();
//!
//! let catalog = CatalogBuilder::new()
//!     .with_feature("Facturacion", FeatureKind::Page, "core/Facturacion")
//!     .build()
//!     .unwrap();
//!
//! let issues = validate_tenants(&catalog, &directory, true).unwrap();
//! assert!(issues.is_empty());
//!
//! let resolver = FeatureResolver::new(Arc::new(directory), Arc::new(catalog));
//! let result = resolver.resolve("centro-abc", "Facturacion").await.unwrap();
//!
//! assert_eq!(result.provenance, Provenance::Default);
//! assert_eq!(
//!     resolver.resolve("unknown-co", "Facturacion").await,
//!     Err(ResolveError::TenantNotFound("unknown-co".into()))
//! );
//! # });
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod feature;
pub mod resolver;

pub use cache::{CacheStats, ResolutionCache};
pub use catalog::{
    CatalogBuilder, CatalogIssue, FeatureCatalog, FeatureDescriptor, OverrideLoader,
    StaticFeatureCatalog, validate_tenants,
};
pub use error::{CatalogError, Disposition, OverrideLoadFailed, ResolveError};
pub use feature::{FeatureInput, FeatureKind, ImplementationRef};
pub use resolver::{
    FeatureResolver, LoggingObserver, Provenance, ResolutionObserver, ResolutionResult,
};

/// Prelude for common imports
pub mod prelude {
    pub use crate::catalog::{CatalogBuilder, FeatureCatalog, OverrideLoader, StaticFeatureCatalog};
    pub use crate::error::{OverrideLoadFailed, ResolveError};
    pub use crate::feature::{FeatureInput, FeatureKind, ImplementationRef};
    pub use crate::resolver::{FeatureResolver, Provenance, ResolutionResult};
}
