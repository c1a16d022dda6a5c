//! Request pipeline.
//!
//! `/{tenant}/{route}` goes through, in order: tenant existence, route
//! lookup, tenant-exclusive routes, the login-route check, the access gate,
//! feature resolution, and chrome selection.

use crate::chrome::{Chrome, ChromeSelector};
use crate::error::{PlatformError, Result};
use crate::render::{CommitStatus, PageOutcome, PresentationSurface, RenderPlan, RenderTarget};
use crate::route::{RouteEntry, RouteTable};
use mosaic_auth::{AccessGate, AuthError, GateState};
use mosaic_config::{PlatformSettings, Validate};
use mosaic_features::{
    CatalogIssue, FeatureCatalog, FeatureInput, FeatureKind, FeatureResolver, ResolutionObserver,
    ResolutionResult, ResolveError, validate_tenants,
};
use mosaic_session::{InMemorySessionStore, Session, SessionConfig, SessionStore};
use mosaic_tenancy::{TenantConfig, TenantDirectory, TenantError, TenantPathResolver};
use std::sync::Arc;

/// Assembled platform: directory, catalog, gate, and routes.
pub struct Platform {
    settings: PlatformSettings,
    directory: Arc<TenantDirectory>,
    resolver: FeatureResolver,
    gate: AccessGate,
    sessions: Arc<dyn SessionStore>,
    routes: RouteTable,
    chrome: ChromeSelector,
    paths: TenantPathResolver,
    issues: Vec<CatalogIssue>,
}

impl Platform {
    /// Start assembling a platform
    pub fn builder(settings: PlatformSettings) -> PlatformBuilder {
        PlatformBuilder::new(settings)
    }

    /// Settings in effect
    pub fn settings(&self) -> &PlatformSettings {
        &self.settings
    }

    /// Tenant directory
    pub fn directory(&self) -> &TenantDirectory {
        &self.directory
    }

    /// Feature resolver
    pub fn resolver(&self) -> &FeatureResolver {
        &self.resolver
    }

    /// Route table
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Non-fatal findings from startup validation
    pub fn startup_issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    /// Tenants in identifier order
    pub fn tenants(&self) -> impl Iterator<Item = &TenantConfig> {
        self.directory.all()
    }

    /// Resolve the implementation of a feature for a tenant
    pub async fn resolve_feature(
        &self,
        tenant_id: &str,
        feature: &str,
    ) -> std::result::Result<ResolutionResult, ResolveError> {
        self.resolver.resolve(tenant_id, feature).await
    }

    /// Whether the tenant exists and has not disabled the feature
    pub fn is_feature_enabled(&self, tenant_id: &str, feature: &str) -> bool {
        self.resolver.is_feature_enabled(tenant_id, feature)
    }

    /// Evaluate the access gate for a tenant
    pub async fn check_access(
        &self,
        tenant_id: &str,
        feature_requires_login: bool,
    ) -> std::result::Result<GateState, ResolveError> {
        let tenant = self
            .directory
            .get(tenant_id)
            .ok_or_else(|| ResolveError::TenantNotFound(tenant_id.to_string()))?;
        Ok(self.gate.check_access(tenant, feature_requires_login).await)
    }

    /// Chrome for a tenant-relative route
    pub fn chrome_for(&self, route: &str) -> Chrome {
        self.chrome.chrome_for(route)
    }

    /// Handle a request path.
    ///
    /// Only catalog misconfiguration is an error; everything else is an
    /// outcome the caller shows.
    pub async fn handle(&self, path: &str) -> Result<PageOutcome> {
        mosaic_log::debug!(target: "mosaic::platform", "handling {}", path);

        let (tenant, split) = match self.paths.resolve(&self.directory, path) {
            Ok(resolved) => resolved,
            Err(TenantError::NotFound(id)) => {
                return Ok(not_found(format!("unknown tenant '{}'", id)));
            }
            Err(_) => return Ok(not_found(format!("no tenant in path '{}'", path))),
        };

        let Some(entry) = self.routes.lookup(&split.route) else {
            return Ok(not_found(format!("unknown route '{}'", split.route)));
        };

        if !entry.admits(&tenant.id) {
            return Ok(PageOutcome::Redirect {
                location: tenant.home_path(),
            });
        }

        if entry.kind == FeatureKind::Login && !tenant.requires_login {
            return Ok(not_found(format!("tenant '{}' has no login", tenant.id)));
        }

        if entry.guarded
            && let GateState::Unauthenticated { redirect_to } =
                self.gate.check_access(&tenant, true).await
        {
            return Ok(PageOutcome::Redirect {
                location: redirect_to,
            });
        }

        let resolution = match self.resolver.resolve(&tenant.id, &entry.feature).await {
            Ok(resolution) => resolution,
            Err(ResolveError::TenantNotFound(id)) => {
                return Ok(not_found(format!("unknown tenant '{}'", id)));
            }
            Err(ResolveError::FeatureDisabled { feature, .. }) => {
                return Ok(PageOutcome::Disabled { feature });
            }
            Err(e) => return Err(e.into()),
        };

        let input = input_for(entry, tenant.clone());
        if !resolution.implementation.accepts(&input) {
            return Err(PlatformError::InputMismatch {
                feature: entry.feature.clone(),
                implementation: resolution.implementation.id.clone(),
                input: input.kind(),
            });
        }

        Ok(PageOutcome::Render(RenderPlan {
            tenant,
            route: split.route,
            resolution,
            input,
            chrome: ChromeSelector::decide(entry.route_kind()),
        }))
    }

    /// Handle `path` and commit the outcome to `target`.
    ///
    /// A newer navigation started on the same target while this one was
    /// resolving makes the result stale, and it is dropped.
    pub async fn navigate<S: PresentationSurface>(
        &self,
        target: &RenderTarget<S>,
        path: &str,
    ) -> Result<CommitStatus> {
        let ticket = target.begin();
        let outcome = self.handle(path).await?;
        Ok(target.commit(ticket, outcome))
    }

    /// Record an authenticated session for a tenant that requires login
    pub async fn sign_in(&self, tenant_id: &str, identity: &str) -> Result<()> {
        let tenant = self.login_tenant(tenant_id)?;
        self.sessions
            .write(&Session::authenticated(&tenant.id, identity))
            .await?;

        mosaic_log::info!(target: "mosaic::platform", "signed in"; tenant = tenant.id);
        Ok(())
    }

    /// Clear a tenant's session
    pub async fn sign_out(&self, tenant_id: &str) -> Result<()> {
        let tenant = self.login_tenant(tenant_id)?;
        self.sessions.clear(&tenant.id).await?;

        mosaic_log::info!(target: "mosaic::platform", "signed out"; tenant = tenant.id);
        Ok(())
    }

    fn login_tenant(&self, tenant_id: &str) -> Result<Arc<TenantConfig>> {
        let tenant = self.directory.lookup(tenant_id)?;
        if !tenant.requires_login {
            return Err(AuthError::LoginNotEnforced(tenant.id.clone()).into());
        }
        Ok(tenant)
    }
}

fn input_for(entry: &RouteEntry, tenant: Arc<TenantConfig>) -> FeatureInput {
    match entry.kind {
        FeatureKind::Page => FeatureInput::page(tenant),
        FeatureKind::Login => {
            let home = tenant.home_path();
            FeatureInput::login(tenant, Some(home))
        }
        FeatureKind::Console => {
            let slug = entry.system_slug.clone().unwrap_or_default();
            FeatureInput::console(tenant, slug)
        }
    }
}

fn not_found(reason: String) -> PageOutcome {
    mosaic_log::debug!(target: "mosaic::platform", "not found"; reason = reason);
    PageOutcome::NotFound { reason }
}

/// Builder for [`Platform`].
pub struct PlatformBuilder {
    settings: PlatformSettings,
    directory: Option<TenantDirectory>,
    catalog: Option<Arc<dyn FeatureCatalog>>,
    sessions: Option<Arc<dyn SessionStore>>,
    routes: Option<RouteTable>,
    observer: Option<Arc<dyn ResolutionObserver>>,
}

impl PlatformBuilder {
    pub fn new(settings: PlatformSettings) -> Self {
        Self {
            settings,
            directory: None,
            catalog: None,
            sessions: None,
            routes: None,
            observer: None,
        }
    }

    /// Use an already built tenant directory instead of `tenants_file`
    pub fn with_directory(mut self, directory: TenantDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Feature catalog (required)
    pub fn with_catalog(mut self, catalog: Arc<dyn FeatureCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Session store; defaults to an in-memory store
    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Route table; defaults to [`RouteTable::standard`]
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Resolution observer; defaults to logging
    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validate settings, then assemble the platform and validate tenants
    /// against the catalog
    pub fn build(self) -> Result<Platform> {
        let settings = self.settings;
        settings.validate()?;

        let directory = match (self.directory, &settings.tenants_file) {
            (Some(directory), _) => directory,
            (None, Some(path)) => TenantDirectory::from_file(path)?,
            (None, None) => return Err(PlatformError::Incomplete("a tenant directory")),
        };
        let catalog = self
            .catalog
            .ok_or(PlatformError::Incomplete("a feature catalog"))?;

        let issues = validate_tenants(catalog.as_ref(), &directory, settings.strict_overrides)?;

        let directory = Arc::new(directory);
        let mut resolver = FeatureResolver::new(directory.clone(), catalog)
            .with_memoization(settings.memoize);
        if let Some(observer) = self.observer {
            resolver = resolver.with_observer(observer);
        }

        let sessions = self.sessions.unwrap_or_else(|| {
            let config = SessionConfig::default().with_namespace(&settings.session_namespace);
            Arc::new(InMemorySessionStore::with_config(config))
        });

        let gate = AccessGate::new(sessions.clone()).with_login_segment(&settings.login_segment);
        let routes = self
            .routes
            .unwrap_or_else(|| RouteTable::standard(&settings.login_segment));
        let chrome = ChromeSelector::new(&settings.login_segment);

        mosaic_log::info!(
            target: "mosaic::platform",
            "platform ready";
            tenants = directory.len(),
            routes = routes.len(),
            issues = issues.len()
        );

        Ok(Platform {
            settings,
            directory,
            resolver,
            gate,
            sessions,
            routes,
            chrome,
            paths: TenantPathResolver::default(),
            issues,
        })
    }
}
