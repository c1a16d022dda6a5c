//! Feature Resolution
//!
//! Maps (tenant, feature) to the implementation that should render.
//!
//! Checks run in a fixed order, and the first failing check decides the error:
//!
//! 1. the tenant exists ([`ResolveError::TenantNotFound`]);
//! 2. the tenant has not disabled the feature ([`ResolveError::FeatureDisabled`]);
//! 3. an allow-listed override is tried, falling back on failure;
//! 4. the default implementation ([`ResolveError::FeatureNotFound`] if absent).

use crate::cache::ResolutionCache;
use crate::catalog::FeatureCatalog;
use crate::error::{OverrideLoadFailed, ResolveError};
use crate::feature::ImplementationRef;
use mosaic_tenancy::TenantDirectory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a resolved implementation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Shared default implementation
    Default,
    /// Tenant-specific override
    Override,
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Tenant the result was computed for
    pub tenant_id: String,
    /// Feature the result was computed for
    pub feature: String,
    /// Implementation to render
    pub implementation: ImplementationRef,
    /// Default or override
    pub provenance: Provenance,
}

impl ResolutionResult {
    /// Whether the tenant's override was selected
    pub fn is_override(&self) -> bool {
        self.provenance == Provenance::Override
    }
}

/// Receives resolution events.
pub trait ResolutionObserver: Send + Sync {
    /// An allow-listed override could not be loaded; the default is used
    fn override_fallback(&self, failure: &OverrideLoadFailed);

    /// A resolution succeeded
    fn resolved(&self, _result: &ResolutionResult) {}
}

/// Observer that writes events to the `mosaic::features` log target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ResolutionObserver for LoggingObserver {
    fn override_fallback(&self, failure: &OverrideLoadFailed) {
        mosaic_log::warn!(
            target: "mosaic::features",
            "override unavailable, using default";
            tenant = failure.tenant,
            feature = failure.feature,
            reason = failure.reason
        );
    }

    fn resolved(&self, result: &ResolutionResult) {
        mosaic_log::trace!(
            target: "mosaic::features",
            "resolved {}", result.implementation;
            tenant = result.tenant_id,
            feature = result.feature
        );
    }
}

/// Tenant-aware feature resolver.
///
/// Shares the directory and catalog read-only; safe to use from many
/// tasks at once.
///
/// # Examples
///
/// ```
/// use mosaic_features::*;
/// use mosaic_tenancy::{TenantConfig, TenantDirectory};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let directory = TenantDirectory::new([
///     TenantConfig::new("empresa-demo", "Demo")
///         .with_module("facturacion", false)
///         .with_custom_feature("Dashboard"),
/// ])
/// .unwrap();
///
/// let catalog = CatalogBuilder::new()
///     .with_feature("Dashboard", FeatureKind::Page, "core/Dashboard")
///     .with_feature("Facturacion", FeatureKind::Page, "core/Facturacion")
///     .with_override("empresa-demo", "Dashboard", "empresa-demo/Dashboard")
///     .build()
///     .unwrap();
///
/// let resolver = FeatureResolver::new(Arc::new(directory), Arc::new(catalog));
///
/// let dashboard = resolver.resolve("empresa-demo", "Dashboard").await.unwrap();
/// assert_eq!(dashboard.provenance, Provenance::Override);
///
/// let billing = resolver.resolve("empresa-demo", "Facturacion").await;
/// assert!(matches!(billing, Err(ResolveError::FeatureDisabled { .. })));
/// # });
/// ```
pub struct FeatureResolver {
    directory: Arc<TenantDirectory>,
    catalog: Arc<dyn FeatureCatalog>,
    cache: Option<ResolutionCache>,
    observer: Arc<dyn ResolutionObserver>,
}

impl FeatureResolver {
    /// Create a resolver with memoization and the logging observer
    pub fn new(directory: Arc<TenantDirectory>, catalog: Arc<dyn FeatureCatalog>) -> Self {
        Self {
            directory,
            catalog,
            cache: Some(ResolutionCache::new()),
            observer: Arc::new(LoggingObserver),
        }
    }

    /// Enable or disable memoization
    pub fn with_memoization(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(ResolutionCache::new);
        self
    }

    /// Replace the observer
    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Tenant directory in use
    pub fn directory(&self) -> &TenantDirectory {
        &self.directory
    }

    /// Catalog in use
    pub fn catalog(&self) -> &dyn FeatureCatalog {
        self.catalog.as_ref()
    }

    /// Memoization cache, if enabled
    pub fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    /// Resolve the implementation of `feature` for `tenant_id`.
    ///
    /// A failed override load is reported to the observer and never
    /// fails the resolution. Such fallback results are not memoized.
    pub async fn resolve(
        &self,
        tenant_id: &str,
        feature: &str,
    ) -> Result<ResolutionResult, ResolveError> {
        let tenant = self
            .directory
            .get(tenant_id)
            .ok_or_else(|| ResolveError::TenantNotFound(tenant_id.to_string()))?;

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(tenant_id, feature)) {
            return Ok(hit);
        }

        if !tenant.module_state(feature).permits() {
            return Err(ResolveError::FeatureDisabled {
                tenant: tenant_id.to_string(),
                feature: feature.to_string(),
            });
        }

        let mut fell_back = false;
        if tenant.allows_override(feature) {
            match self.catalog.override_impl(tenant_id, feature).await {
                Ok(implementation) => {
                    let result =
                        self.finish(tenant_id, feature, implementation, Provenance::Override, true);
                    return Ok(result);
                }
                Err(failure) => {
                    self.observer.override_fallback(&failure);
                    fell_back = true;
                }
            }
        }

        let Some(implementation) = self.catalog.default_impl(feature) else {
            mosaic_log::error!(
                target: "mosaic::features",
                "no default implementation registered";
                tenant = tenant_id,
                feature = feature
            );
            return Err(ResolveError::FeatureNotFound(feature.to_string()));
        };

        Ok(self.finish(tenant_id, feature, implementation, Provenance::Default, !fell_back))
    }

    /// Whether the tenant exists and has not disabled the feature.
    ///
    /// Unlisted features count as enabled.
    pub fn is_feature_enabled(&self, tenant_id: &str, feature: &str) -> bool {
        self.directory
            .get(tenant_id)
            .is_some_and(|tenant| tenant.module_state(feature).permits())
    }

    fn finish(
        &self,
        tenant_id: &str,
        feature: &str,
        implementation: ImplementationRef,
        provenance: Provenance,
        memoize: bool,
    ) -> ResolutionResult {
        let result = ResolutionResult {
            tenant_id: tenant_id.to_string(),
            feature: feature.to_string(),
            implementation,
            provenance,
        };

        if memoize && let Some(cache) = &self.cache {
            cache.insert(result.clone());
        }
        self.observer.resolved(&result);
        result
    }
}
