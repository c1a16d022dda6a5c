//! Feature kinds, implementation references, and typed inputs.

use mosaic_tenancy::TenantConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Closed set of feature shapes.
///
/// Each kind has its own input contract, see [`FeatureInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Standard tenant page
    Page,
    /// Authentication entry point
    Login,
    /// System administration screen
    Console,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Page => write!(f, "page"),
            FeatureKind::Login => write!(f, "login"),
            FeatureKind::Console => write!(f, "console"),
        }
    }
}

/// Reference to a renderable implementation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementationRef {
    /// Identifier understood by the presentation surface
    pub id: String,
    /// Input contract the unit expects
    pub kind: FeatureKind,
}

impl ImplementationRef {
    /// Create a reference
    pub fn new(id: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Reference to a page unit
    pub fn page(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::Page)
    }

    /// Reference to a login unit
    pub fn login(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::Login)
    }

    /// Reference to a console unit
    pub fn console(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::Console)
    }

    /// Whether this unit can be handed `input`.
    ///
    /// ```
    /// use mosaic_features::{FeatureInput, ImplementationRef};
    /// use mosaic_tenancy::TenantConfig;
    /// use std::sync::Arc;
    ///
    /// let tenant = Arc::new(TenantConfig::new("centro-abc", "Centro ABC"));
    /// let dashboard = ImplementationRef::page("core/Dashboard");
    ///
    /// assert!(dashboard.accepts(&FeatureInput::page(tenant.clone())));
    /// assert!(!dashboard.accepts(&FeatureInput::login(tenant, None)));
    /// ```
    pub fn accepts(&self, input: &FeatureInput) -> bool {
        self.kind == input.kind()
    }
}

impl fmt::Display for ImplementationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

/// Typed input handed to a resolved unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureInput {
    /// Page input: the tenant and its configuration
    Page { tenant: Arc<TenantConfig> },
    /// Login input: the tenant and where to go after signing in
    Login {
        tenant: Arc<TenantConfig>,
        return_to: Option<String>,
    },
    /// Console input: the tenant and the administered system
    Console {
        tenant: Arc<TenantConfig>,
        system_slug: String,
    },
}

impl FeatureInput {
    /// Page input
    pub fn page(tenant: Arc<TenantConfig>) -> Self {
        FeatureInput::Page { tenant }
    }

    /// Login input
    pub fn login(tenant: Arc<TenantConfig>, return_to: Option<String>) -> Self {
        FeatureInput::Login { tenant, return_to }
    }

    /// Console input
    pub fn console(tenant: Arc<TenantConfig>, system_slug: impl Into<String>) -> Self {
        FeatureInput::Console {
            tenant,
            system_slug: system_slug.into(),
        }
    }

    /// Kind of unit this input is for
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureInput::Page { .. } => FeatureKind::Page,
            FeatureInput::Login { .. } => FeatureKind::Login,
            FeatureInput::Console { .. } => FeatureKind::Console,
        }
    }

    /// Tenant the input belongs to
    pub fn tenant(&self) -> &TenantConfig {
        match self {
            FeatureInput::Page { tenant }
            | FeatureInput::Login { tenant, .. }
            | FeatureInput::Console { tenant, .. } => tenant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> Arc<TenantConfig> {
        Arc::new(TenantConfig::new("sistemas-vaxa", "Sistemas Vaxa"))
    }

    #[test]
    fn test_input_kinds() {
        assert_eq!(FeatureInput::page(tenant()).kind(), FeatureKind::Page);
        assert_eq!(
            FeatureInput::login(tenant(), Some("/sistemas-vaxa".into())).kind(),
            FeatureKind::Login
        );
        let console = FeatureInput::console(tenant(), "certificaciones");
        assert_eq!(console.kind(), FeatureKind::Console);
        assert_eq!(console.tenant().id, "sistemas-vaxa");
    }

    #[test]
    fn test_accepts_matches_kind() {
        let plan = ImplementationRef::console("sistemas-vaxa/PlanSistema");
        assert!(plan.accepts(&FeatureInput::console(tenant(), "certificaciones")));
        assert!(!plan.accepts(&FeatureInput::page(tenant())));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ImplementationRef::login("core/Login").to_string(),
            "core/Login (login)"
        );
    }
}
