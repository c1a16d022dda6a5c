//! Feature Catalog
//!
//! Registry of implementations: exactly one default per feature and at most
//! one override per (tenant, feature) pair. Built once at startup and
//! read-only afterwards.

use crate::error::{CatalogError, OverrideLoadFailed};
use crate::feature::{FeatureKind, ImplementationRef};
use async_trait::async_trait;
use mosaic_tenancy::TenantDirectory;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Source of implementations consumed by the resolver.
#[async_trait]
pub trait FeatureCatalog: Send + Sync {
    /// Default implementation of a feature, `None` if not registered
    fn default_impl(&self, feature: &str) -> Option<ImplementationRef>;

    /// Load the override of `feature` for `tenant_id`.
    ///
    /// May suspend. Fails with [`OverrideLoadFailed`] when no override is
    /// registered or the registered one cannot be loaded.
    async fn override_impl(
        &self,
        tenant_id: &str,
        feature: &str,
    ) -> Result<ImplementationRef, OverrideLoadFailed>;

    /// Whether an override is registered for the pair
    fn has_override(&self, tenant_id: &str, feature: &str) -> bool;

    /// Registered feature names
    fn features(&self) -> Vec<String>;

    /// Registered (tenant, feature) override pairs
    fn overrides(&self) -> Vec<(String, String)>;
}

/// Deferred override source.
///
/// Implementations may suspend (e.g. fetch or unpack the unit) and may fail.
#[async_trait]
pub trait OverrideLoader: Send + Sync {
    /// Load the override implementation
    async fn load(
        &self,
        tenant_id: &str,
        feature: &str,
    ) -> Result<ImplementationRef, OverrideLoadFailed>;
}

#[derive(Clone)]
enum OverrideSource {
    Ready(ImplementationRef),
    Deferred(Arc<dyn OverrideLoader>),
}

impl fmt::Debug for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideSource::Ready(imp) => f.debug_tuple("Ready").field(imp).finish(),
            OverrideSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

// Ready overrides take the feature's kind, known only at build time
enum PendingOverride {
    Ready(String),
    Deferred(Arc<dyn OverrideLoader>),
}

impl fmt::Debug for PendingOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOverride::Ready(id) => f.debug_tuple("Ready").field(id).finish(),
            PendingOverride::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A registered feature: its kind, default, and tenant overrides.
#[derive(Debug, Clone)]
pub struct FeatureDescriptor {
    name: String,
    kind: FeatureKind,
    default: ImplementationRef,
    overrides: BTreeMap<String, OverrideSource>,
}

impl FeatureDescriptor {
    /// Feature name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature kind
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Default implementation
    pub fn default_impl(&self) -> &ImplementationRef {
        &self.default
    }

    /// Tenants with a registered override
    pub fn override_tenants(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }
}

/// Catalog fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureCatalog {
    features: BTreeMap<String, FeatureDescriptor>,
}

impl StaticFeatureCatalog {
    /// Start building a catalog
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Registered descriptor for a feature
    pub fn descriptor(&self, feature: &str) -> Option<&FeatureDescriptor> {
        self.features.get(feature)
    }

    /// Kind of a registered feature
    pub fn kind_of(&self, feature: &str) -> Option<FeatureKind> {
        self.features.get(feature).map(|d| d.kind)
    }

    /// Number of registered features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether no features are registered
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[async_trait]
impl FeatureCatalog for StaticFeatureCatalog {
    fn default_impl(&self, feature: &str) -> Option<ImplementationRef> {
        self.features.get(feature).map(|d| d.default.clone())
    }

    async fn override_impl(
        &self,
        tenant_id: &str,
        feature: &str,
    ) -> Result<ImplementationRef, OverrideLoadFailed> {
        let descriptor = self.features.get(feature).ok_or_else(|| {
            OverrideLoadFailed::new(tenant_id, feature, "feature is not registered")
        })?;

        let source = descriptor.overrides.get(tenant_id).ok_or_else(|| {
            OverrideLoadFailed::new(tenant_id, feature, "no override registered")
        })?;

        let loaded = match source {
            OverrideSource::Ready(imp) => imp.clone(),
            OverrideSource::Deferred(loader) => loader.load(tenant_id, feature).await?,
        };

        if loaded.kind != descriptor.kind {
            return Err(OverrideLoadFailed::new(
                tenant_id,
                feature,
                format!(
                    "override '{}' is a {} unit, feature expects {}",
                    loaded.id, loaded.kind, descriptor.kind
                ),
            ));
        }

        Ok(loaded)
    }

    fn has_override(&self, tenant_id: &str, feature: &str) -> bool {
        self.features
            .get(feature)
            .is_some_and(|d| d.overrides.contains_key(tenant_id))
    }

    fn features(&self) -> Vec<String> {
        self.features.keys().cloned().collect()
    }

    fn overrides(&self) -> Vec<(String, String)> {
        self.features
            .values()
            .flat_map(|d| {
                d.overrides
                    .keys()
                    .map(move |tenant| (tenant.clone(), d.name.clone()))
            })
            .collect()
    }
}

/// Builder for [`StaticFeatureCatalog`].
///
/// # Examples
///
/// ```
/// use mosaic_features::{CatalogBuilder, FeatureKind};
///
/// let catalog = CatalogBuilder::new()
///     .with_feature("Dashboard", FeatureKind::Page, "core/Dashboard")
///     .with_feature("Login", FeatureKind::Login, "core/Login")
///     .with_override("empresa-demo", "Dashboard", "empresa-demo/Dashboard")
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    features: BTreeMap<String, FeatureDescriptor>,
    overrides: Vec<(String, String, PendingOverride)>,
    error: Option<CatalogError>,
}

impl CatalogBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature and its default implementation
    pub fn with_feature(
        mut self,
        name: impl Into<String>,
        kind: FeatureKind,
        default_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        if self.features.contains_key(&name) {
            self.error.get_or_insert(CatalogError::DuplicateFeature(name));
            return self;
        }

        self.features.insert(
            name.clone(),
            FeatureDescriptor {
                name,
                kind,
                default: ImplementationRef::new(default_id, kind),
                overrides: BTreeMap::new(),
            },
        );
        self
    }

    /// Register a ready override; it takes the feature's kind
    pub fn with_override(
        mut self,
        tenant_id: impl Into<String>,
        feature: impl Into<String>,
        impl_id: impl Into<String>,
    ) -> Self {
        self.overrides.push((
            tenant_id.into(),
            feature.into(),
            PendingOverride::Ready(impl_id.into()),
        ));
        self
    }

    /// Register an override that is loaded on first use
    pub fn with_deferred_override(
        mut self,
        tenant_id: impl Into<String>,
        feature: impl Into<String>,
        loader: impl OverrideLoader + 'static,
    ) -> Self {
        self.overrides.push((
            tenant_id.into(),
            feature.into(),
            PendingOverride::Deferred(Arc::new(loader)),
        ));
        self
    }

    /// Build the catalog.
    ///
    /// Fails on duplicate features, overrides of unregistered features,
    /// and duplicate (tenant, feature) overrides.
    pub fn build(self) -> Result<StaticFeatureCatalog, CatalogError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut features = self.features;
        for (tenant, feature, source) in self.overrides {
            let descriptor = features
                .get_mut(&feature)
                .ok_or_else(|| CatalogError::UnknownFeature(feature.clone()))?;

            if descriptor.overrides.contains_key(&tenant) {
                return Err(CatalogError::DuplicateOverride { tenant, feature });
            }

            let source = match source {
                PendingOverride::Ready(id) => {
                    OverrideSource::Ready(ImplementationRef::new(id, descriptor.kind))
                }
                PendingOverride::Deferred(loader) => OverrideSource::Deferred(loader),
            };
            descriptor.overrides.insert(tenant, source);
        }

        mosaic_log::debug!(
            target: "mosaic::features",
            "feature catalog built";
            features = features.len()
        );

        Ok(StaticFeatureCatalog { features })
    }
}

/// Non-fatal finding from [`validate_tenants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// Allow-listed override with nothing registered; resolution falls back to default
    MissingOverride { tenant: String, feature: String },
    /// Registered override the tenant does not allow-list; never selected
    UnlistedOverride { tenant: String, feature: String },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::MissingOverride { tenant, feature } => write!(
                f,
                "tenant '{}' allow-lists '{}' but no override is registered",
                tenant, feature
            ),
            CatalogIssue::UnlistedOverride { tenant, feature } => write!(
                f,
                "override of '{}' for tenant '{}' is not allow-listed",
                feature, tenant
            ),
        }
    }
}

/// Check tenant allow-lists against the catalog.
///
/// A `customFeatures` entry naming an unregistered feature is always an
/// error. Allow-listed features without a registered override are
/// reported as issues, or rejected when `strict` is set.
pub fn validate_tenants(
    catalog: &dyn FeatureCatalog,
    directory: &TenantDirectory,
    strict: bool,
) -> Result<Vec<CatalogIssue>, CatalogError> {
    let registered: BTreeSet<String> = catalog.features().into_iter().collect();
    let mut issues = Vec::new();

    for tenant in directory.all() {
        for feature in &tenant.custom_features {
            if !registered.contains(feature) {
                return Err(CatalogError::UndeclaredCustomFeature {
                    tenant: tenant.id.clone(),
                    feature: feature.clone(),
                });
            }

            if !catalog.has_override(&tenant.id, feature) {
                if strict {
                    return Err(CatalogError::MissingOverride {
                        tenant: tenant.id.clone(),
                        feature: feature.clone(),
                    });
                }
                issues.push(CatalogIssue::MissingOverride {
                    tenant: tenant.id.clone(),
                    feature: feature.clone(),
                });
            }
        }
    }

    for (tenant, feature) in catalog.overrides() {
        let listed = directory
            .get(&tenant)
            .is_some_and(|t| t.allows_override(&feature));
        if !listed {
            issues.push(CatalogIssue::UnlistedOverride { tenant, feature });
        }
    }

    for issue in &issues {
        mosaic_log::warn!(target: "mosaic::features", "catalog issue: {}", issue);
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_tenancy::TenantConfig;

    struct Broken;

    #[async_trait]
    impl OverrideLoader for Broken {
        async fn load(
            &self,
            tenant_id: &str,
            feature: &str,
        ) -> Result<ImplementationRef, OverrideLoadFailed> {
            Err(OverrideLoadFailed::new(tenant_id, feature, "asset missing"))
        }
    }

    struct WrongKind;

    #[async_trait]
    impl OverrideLoader for WrongKind {
        async fn load(&self, _: &str, _: &str) -> Result<ImplementationRef, OverrideLoadFailed> {
            Ok(ImplementationRef::login("empresa-demo/Home"))
        }
    }

    fn catalog() -> StaticFeatureCatalog {
        CatalogBuilder::new()
            .with_feature("Home", FeatureKind::Page, "core/Home")
            .with_feature("Dashboard", FeatureKind::Page, "core/Dashboard")
            .with_feature("Login", FeatureKind::Login, "core/Login")
            .with_override("empresa-demo", "Dashboard", "empresa-demo/Dashboard")
            .with_deferred_override("empresa-demo", "Home", Broken)
            .with_override("empresa-techpro", "Login", "empresa-techpro/Login")
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let catalog = catalog();
        assert_eq!(
            catalog.default_impl("Dashboard"),
            Some(ImplementationRef::page("core/Dashboard"))
        );
        assert_eq!(catalog.default_impl("Reportes"), None);
        assert_eq!(catalog.kind_of("Login"), Some(FeatureKind::Login));
        assert_eq!(catalog.features(), vec!["Dashboard", "Home", "Login"]);
    }

    #[tokio::test]
    async fn test_ready_override_takes_feature_kind() {
        let catalog = catalog();
        let login = catalog
            .override_impl("empresa-techpro", "Login")
            .await
            .unwrap();
        assert_eq!(login, ImplementationRef::login("empresa-techpro/Login"));
    }

    #[tokio::test]
    async fn test_override_failures() {
        let catalog = catalog();

        let err = catalog.override_impl("empresa-demo", "Home").await.unwrap_err();
        assert_eq!(err.reason, "asset missing");

        let err = catalog
            .override_impl("centro-abc", "Dashboard")
            .await
            .unwrap_err();
        assert_eq!(err.tenant, "centro-abc");

        assert!(catalog.override_impl("centro-abc", "Reportes").await.is_err());
    }

    #[tokio::test]
    async fn test_loaded_override_must_match_kind() {
        let catalog = CatalogBuilder::new()
            .with_feature("Home", FeatureKind::Page, "core/Home")
            .with_deferred_override("empresa-demo", "Home", WrongKind)
            .build()
            .unwrap();

        let err = catalog.override_impl("empresa-demo", "Home").await.unwrap_err();
        assert!(err.reason.contains("login unit"));
    }

    #[test]
    fn test_build_rejects_bad_registrations() {
        assert_eq!(
            CatalogBuilder::new()
                .with_feature("Home", FeatureKind::Page, "a")
                .with_feature("Home", FeatureKind::Page, "b")
                .build()
                .unwrap_err(),
            CatalogError::DuplicateFeature("Home".into())
        );

        assert_eq!(
            CatalogBuilder::new()
                .with_override("empresa-demo", "Home", "x")
                .build()
                .unwrap_err(),
            CatalogError::UnknownFeature("Home".into())
        );

        assert!(matches!(
            CatalogBuilder::new()
                .with_feature("Home", FeatureKind::Page, "core/Home")
                .with_override("empresa-demo", "Home", "x")
                .with_override("empresa-demo", "Home", "y")
                .build(),
            Err(CatalogError::DuplicateOverride { .. })
        ));
    }

    #[test]
    fn test_descriptor() {
        let catalog = catalog();
        let descriptor = catalog.descriptor("Dashboard").unwrap();
        assert_eq!(descriptor.name(), "Dashboard");
        assert_eq!(descriptor.kind(), FeatureKind::Page);
        assert_eq!(descriptor.default_impl().id, "core/Dashboard");
        assert_eq!(
            descriptor.override_tenants().collect::<Vec<_>>(),
            vec!["empresa-demo"]
        );
    }

    #[test]
    fn test_validate_tenants() {
        let catalog = catalog();
        let directory = TenantDirectory::new([
            TenantConfig::new("empresa-demo", "Demo")
                .with_custom_feature("Dashboard")
                .with_custom_feature("Home"),
            TenantConfig::new("empresa-techpro", "TechPro")
                .with_custom_feature("Login")
                .with_custom_feature("Dashboard"),
        ])
        .unwrap();

        let issues = validate_tenants(&catalog, &directory, false).unwrap();
        assert_eq!(
            issues,
            vec![CatalogIssue::MissingOverride {
                tenant: "empresa-techpro".into(),
                feature: "Dashboard".into(),
            }]
        );

        assert_eq!(
            validate_tenants(&catalog, &directory, true).unwrap_err(),
            CatalogError::MissingOverride {
                tenant: "empresa-techpro".into(),
                feature: "Dashboard".into(),
            }
        );
    }

    #[test]
    fn test_validate_rejects_undeclared_features() {
        let directory = TenantDirectory::new([
            TenantConfig::new("centro-abc", "ABC").with_custom_feature("Reportes"),
        ])
        .unwrap();

        assert!(matches!(
            validate_tenants(&catalog(), &directory, false),
            Err(CatalogError::UndeclaredCustomFeature { .. })
        ));
    }

    #[test]
    fn test_validate_reports_unlisted_overrides() {
        let directory =
            TenantDirectory::new([TenantConfig::new("empresa-demo", "Demo")]).unwrap();

        let issues = validate_tenants(&catalog(), &directory, true).unwrap();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| matches!(i, CatalogIssue::UnlistedOverride { .. })));
    }
}
