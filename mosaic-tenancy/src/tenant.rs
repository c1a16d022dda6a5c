//! Tenant Configuration
//!
//! Immutable per-tenant settings and the request-scoped tenant context.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Enablement of a feature module for a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Listed in `modules` with `true`
    Enabled,
    /// Listed in `modules` with `false`
    Disabled,
    /// Not listed; unlisted features are enabled
    Unlisted,
}

impl ModuleState {
    /// Whether resolution may proceed
    pub fn permits(&self) -> bool {
        !matches!(self, ModuleState::Disabled)
    }
}

/// Tenant configuration
///
/// Accepts the source document field names (`primaryColor`,
/// `customModules`, `hasLogin`) as aliases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Unique, stable tenant identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Presentation accent identifier
    #[serde(default = "default_accent", alias = "primaryColor")]
    pub accent: String,

    /// Optional logo reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Feature enablement keyed by lowercase feature name
    #[serde(default)]
    pub modules: BTreeMap<String, bool>,

    /// Features this tenant supplies an override for
    #[serde(default, alias = "customModules")]
    pub custom_features: BTreeSet<String>,

    /// Whether guarded features require an authenticated session
    #[serde(default, alias = "hasLogin")]
    pub requires_login: bool,

    /// Additional metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

fn default_accent() -> String {
    "blue".to_string()
}

impl TenantConfig {
    /// Create a new tenant configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_tenancy::TenantConfig;
    ///
    /// let tenant = TenantConfig::new("centro-abc", "Centro ABC");
    /// assert!(!tenant.requires_login);
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            accent: default_accent(),
            logo: None,
            modules: BTreeMap::new(),
            custom_features: BTreeSet::new(),
            requires_login: false,
            metadata: HashMap::new(),
        }
    }

    /// Set the presentation accent
    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent = accent.into();
        self
    }

    /// Set the logo reference
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Set a module's enablement; the key is stored lowercased
    pub fn with_module(mut self, feature: &str, enabled: bool) -> Self {
        self.modules.insert(module_key(feature), enabled);
        self
    }

    /// Allow-list a tenant override for a feature
    pub fn with_custom_feature(mut self, feature: impl Into<String>) -> Self {
        self.custom_features.insert(feature.into());
        self
    }

    /// Require login for guarded features
    pub fn with_login_required(mut self, required: bool) -> Self {
        self.requires_login = required;
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Enablement of a feature.
    ///
    /// ```
    /// use mosaic_tenancy::{ModuleState, TenantConfig};
    ///
    /// let tenant = TenantConfig::new("empresa-demo", "Demo").with_module("facturacion", false);
    /// assert_eq!(tenant.module_state("Facturacion"), ModuleState::Disabled);
    /// assert_eq!(tenant.module_state("Citas"), ModuleState::Unlisted);
    /// ```
    pub fn module_state(&self, feature: &str) -> ModuleState {
        match self.modules.get(&module_key(feature)) {
            Some(true) => ModuleState::Enabled,
            Some(false) => ModuleState::Disabled,
            None => ModuleState::Unlisted,
        }
    }

    /// Whether the tenant is eligible for an override of `feature`
    pub fn allows_override(&self, feature: &str) -> bool {
        self.custom_features.contains(feature)
    }

    /// Tenant home path
    pub fn home_path(&self) -> String {
        format!("/{}", self.id)
    }
}

/// Key under which a feature's enablement is stored in `modules`
pub fn module_key(feature: &str) -> String {
    feature.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_new() {
        let tenant = TenantConfig::new("centro-abc", "Centro ABC");
        assert_eq!(tenant.id, "centro-abc");
        assert_eq!(tenant.accent, "blue");
        assert!(tenant.modules.is_empty());
        assert!(tenant.custom_features.is_empty());
    }

    #[test]
    fn test_tenant_builder() {
        let tenant = TenantConfig::new("empresa-demo", "Centro de Terapia Demo")
            .with_accent("green")
            .with_logo("/logos/demo.svg")
            .with_module("Dashboard", true)
            .with_custom_feature("Dashboard")
            .with_login_required(true)
            .with_metadata("plan", "premium");

        assert_eq!(tenant.accent, "green");
        assert_eq!(tenant.logo.as_deref(), Some("/logos/demo.svg"));
        assert_eq!(tenant.modules.get("dashboard"), Some(&true));
        assert!(tenant.allows_override("Dashboard"));
        assert!(tenant.requires_login);
        assert_eq!(tenant.metadata.get("plan"), Some(&"premium".to_string()));
        assert_eq!(tenant.home_path(), "/empresa-demo");
    }

    #[test]
    fn test_module_state_is_case_insensitive() {
        let tenant = TenantConfig::new("centro-abc", "Centro ABC")
            .with_module("facturacion", true)
            .with_module("citas", false);

        assert_eq!(tenant.module_state("Facturacion"), ModuleState::Enabled);
        assert_eq!(tenant.module_state("CITAS"), ModuleState::Disabled);
        assert_eq!(tenant.module_state("Terapeutas"), ModuleState::Unlisted);
        assert!(ModuleState::Unlisted.permits());
        assert!(!ModuleState::Disabled.permits());
    }

    #[test]
    fn test_override_allow_list_is_exact() {
        let tenant = TenantConfig::new("empresa-demo", "Demo").with_custom_feature("Dashboard");
        assert!(tenant.allows_override("Dashboard"));
        assert!(!tenant.allows_override("Home"));
    }

    #[test]
    fn test_deserialize_source_field_names() {
        let tenant: TenantConfig = serde_json::from_value(serde_json::json!({
            "id": "empresa-techpro",
            "name": "TechPro",
            "primaryColor": "purple",
            "customModules": ["Login", "Dashboard"],
            "hasLogin": true,
            "modules": { "dashboard": true }
        }))
        .unwrap();

        assert_eq!(tenant.accent, "purple");
        assert!(tenant.allows_override("Login"));
        assert!(tenant.requires_login);
        assert_eq!(tenant.module_state("Dashboard"), ModuleState::Enabled);
    }
}
