// Access gate for tenants that require login

use crate::guard::{GateState, GuardedEntry};
use mosaic_session::{Session, SessionStore};
use mosaic_tenancy::TenantConfig;
use std::sync::Arc;

/// Default route segment of a tenant's login entry point
pub const DEFAULT_LOGIN_SEGMENT: &str = "login";

/// Outcome of the gate for one guarded entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Content may render
    Allow,
    /// Content must not render; navigate to `location`
    Redirect { location: String },
}

impl GateDecision {
    /// Whether content may render
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

/// Decide access from a tenant and its session, without any storage.
///
/// Login is enforced only when the tenant requires it and the feature is
/// guarded. A session belonging to another tenant counts as absent.
///
/// ```
/// use mosaic_auth::{GateDecision, decide};
/// use mosaic_session::Session;
/// use mosaic_tenancy::TenantConfig;
///
/// let tenant = TenantConfig::new("empresa-techpro", "TechPro").with_login_required(true);
///
/// assert_eq!(
///     decide(&tenant, true, None, "/empresa-techpro/login"),
///     GateDecision::Redirect { location: "/empresa-techpro/login".into() }
/// );
///
/// let session = Session::authenticated("empresa-techpro", "ana");
/// assert_eq!(decide(&tenant, true, Some(&session), "/empresa-techpro/login"), GateDecision::Allow);
/// ```
pub fn decide(
    tenant: &TenantConfig,
    feature_requires_login: bool,
    session: Option<&Session>,
    login_path: &str,
) -> GateDecision {
    if !tenant.requires_login || !feature_requires_login {
        return GateDecision::Allow;
    }

    let valid = session.is_some_and(|s| s.tenant_id == tenant.id && s.is_valid());
    if valid {
        GateDecision::Allow
    } else {
        GateDecision::Redirect {
            location: login_path.to_string(),
        }
    }
}

/// Gate that reads session markers from a [`SessionStore`].
///
/// Evaluated fresh on every guarded entry; it never writes sessions.
#[derive(Clone)]
pub struct AccessGate {
    store: Arc<dyn SessionStore>,
    login_segment: String,
}

impl AccessGate {
    /// Create a gate over a session store
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            login_segment: DEFAULT_LOGIN_SEGMENT.to_string(),
        }
    }

    /// Use a different login route segment
    pub fn with_login_segment(mut self, segment: impl Into<String>) -> Self {
        self.login_segment = segment.into();
        self
    }

    /// Login route of a tenant
    pub fn login_path(&self, tenant_id: &str) -> String {
        format!("/{}/{}", tenant_id, self.login_segment)
    }

    /// Session store in use
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Evaluate the gate.
    ///
    /// Returns [`GateState::Authenticated`] or
    /// [`GateState::Unauthenticated`]; a store read failure is logged and
    /// treated as no session.
    pub async fn check_access(&self, tenant: &TenantConfig, feature_requires_login: bool) -> GateState {
        let mut entry = GuardedEntry::new(&tenant.id);
        let decision = self.evaluate(tenant, feature_requires_login).await;
        entry.settle(decision);
        entry.into_state()
    }

    /// Evaluate the gate for a guarded entry, returning the settled entry
    pub async fn enter(&self, tenant: &TenantConfig, feature_requires_login: bool) -> GuardedEntry {
        let mut entry = GuardedEntry::new(&tenant.id);
        let decision = self.evaluate(tenant, feature_requires_login).await;
        entry.settle(decision);
        entry
    }

    async fn evaluate(&self, tenant: &TenantConfig, feature_requires_login: bool) -> GateDecision {
        if !tenant.requires_login || !feature_requires_login {
            return GateDecision::Allow;
        }

        let session = match self.store.read(&tenant.id).await {
            Ok(session) => session,
            Err(e) => {
                mosaic_log::warn!(
                    target: "mosaic::gate",
                    "session read failed, treating as signed out";
                    tenant = tenant.id,
                    error = e
                );
                None
            }
        };

        let decision = decide(
            tenant,
            feature_requires_login,
            session.as_ref(),
            &self.login_path(&tenant.id),
        );

        if let GateDecision::Redirect { location } = &decision {
            mosaic_log::info!(
                target: "mosaic::gate",
                "access denied";
                tenant = tenant.id,
                redirect = location
            );
        }

        decision
    }
}
