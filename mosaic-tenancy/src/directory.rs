//! Tenant Directory
//!
//! Immutable, process-wide lookup of tenant configuration, built once at
//! startup and shared by reference.

use crate::error::TenantError;
use crate::tenant::{TenantConfig, module_key};
use mosaic_config::{ConfigLoader, ConfigValidator};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Immutable tenant directory
#[derive(Debug, Clone, Default)]
pub struct TenantDirectory {
    tenants: BTreeMap<String, Arc<TenantConfig>>,
}

impl TenantDirectory {
    /// Build a directory from tenant configurations.
    ///
    /// Identifiers must be non-empty lowercase slugs and unique. Module
    /// keys are normalized to lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_tenancy::{TenantConfig, TenantDirectory};
    ///
    /// let directory = TenantDirectory::new([
    ///     TenantConfig::new("empresa-demo", "Centro de Terapia Demo"),
    ///     TenantConfig::new("centro-abc", "Centro ABC"),
    /// ])
    /// .unwrap();
    ///
    /// assert!(directory.lookup("centro-abc").is_ok());
    /// assert!(directory.lookup("unknown-co").is_err());
    /// ```
    pub fn new(configs: impl IntoIterator<Item = TenantConfig>) -> Result<Self, TenantError> {
        let mut tenants = BTreeMap::new();

        for mut config in configs {
            ConfigValidator::is_slug(&config.id, "tenant id")
                .map_err(|e| TenantError::Invalid(e.to_string()))?;

            config.modules = normalize_modules(&config.id, config.modules)?;

            if tenants.contains_key(&config.id) {
                return Err(TenantError::Duplicate(config.id));
            }
            tenants.insert(config.id.clone(), Arc::new(config));
        }

        mosaic_log::debug!(target: "mosaic::tenancy", "tenant directory built"; tenants = tenants.len());

        Ok(Self { tenants })
    }

    /// Directory with no tenants
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a parsed configuration document.
    ///
    /// Accepts `{ "tenants": [...] }`, a bare array of tenants, or an object
    /// keyed by tenant id (the key fills in a missing `id`).
    pub fn from_value(value: Value) -> Result<Self, TenantError> {
        let entries = match value {
            Value::Object(mut map) if map.contains_key("tenants") => {
                match map.remove("tenants").unwrap_or(Value::Null) {
                    Value::Array(items) => items,
                    Value::Object(keyed) => keyed_entries(keyed),
                    other => {
                        return Err(TenantError::Invalid(format!(
                            "`tenants` must be an array or table, got {}",
                            kind_of(&other)
                        )));
                    }
                }
            }
            Value::Array(items) => items,
            Value::Object(keyed) => keyed_entries(keyed),
            other => {
                return Err(TenantError::Invalid(format!(
                    "tenant document must be an array or table, got {}",
                    kind_of(&other)
                )));
            }
        };

        let configs = entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<TenantConfig>(entry)
                    .map_err(|e| TenantError::Invalid(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(configs)
    }

    /// Load a directory from a JSON or TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TenantError> {
        let path = path.as_ref();
        let value = ConfigLoader::auto(path)?.load_file(path)?;
        let directory = Self::from_value(value)?;

        mosaic_log::info!(
            target: "mosaic::tenancy",
            "loaded tenant directory";
            path = path.display(),
            tenants = directory.len()
        );

        Ok(directory)
    }

    /// Look up a tenant by identifier
    pub fn lookup(&self, tenant_id: &str) -> Result<Arc<TenantConfig>, TenantError> {
        self.tenants
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| TenantError::NotFound(tenant_id.to_string()))
    }

    /// Borrow a tenant by identifier
    pub fn get(&self, tenant_id: &str) -> Option<&TenantConfig> {
        self.tenants.get(tenant_id).map(|t| t.as_ref())
    }

    /// Check whether a tenant exists
    pub fn contains(&self, tenant_id: &str) -> bool {
        self.tenants.contains_key(tenant_id)
    }

    /// All tenants in identifier order
    pub fn all(&self) -> impl Iterator<Item = &TenantConfig> {
        self.tenants.values().map(|t| t.as_ref())
    }

    /// Number of tenants
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

fn keyed_entries(keyed: serde_json::Map<String, Value>) -> Vec<Value> {
    keyed
        .into_iter()
        .map(|(id, mut entry)| {
            if let Value::Object(ref mut fields) = entry {
                fields.entry("id").or_insert(Value::String(id));
            }
            entry
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

fn normalize_modules(
    tenant_id: &str,
    modules: BTreeMap<String, bool>,
) -> Result<BTreeMap<String, bool>, TenantError> {
    let mut normalized = BTreeMap::new();
    for (key, enabled) in modules {
        let normalized_key = module_key(&key);
        if let Some(previous) = normalized.insert(normalized_key.clone(), enabled)
            && previous != enabled
        {
            return Err(TenantError::Invalid(format!(
                "tenant '{}' sets module '{}' both on and off",
                tenant_id, normalized_key
            )));
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::ModuleState;
    use serde_json::json;

    fn sample() -> TenantDirectory {
        TenantDirectory::new([
            TenantConfig::new("empresa-demo", "Centro de Terapia Demo")
                .with_module("facturacion", false)
                .with_custom_feature("Dashboard"),
            TenantConfig::new("centro-abc", "Centro ABC").with_module("facturacion", true),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let directory = sample();
        let tenant = directory.lookup("empresa-demo").unwrap();
        assert_eq!(tenant.name, "Centro de Terapia Demo");

        match directory.lookup("unknown-co") {
            Err(TenantError::NotFound(id)) => assert_eq!(id, "unknown-co"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_is_ordered() {
        let directory = sample();
        let ids: Vec<_> = directory.all().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["centro-abc", "empresa-demo"]);
        assert_eq!(directory.len(), 2);
        assert!(directory.contains("centro-abc"));
        assert!(!TenantDirectory::empty().contains("centro-abc"));
    }

    #[test]
    fn test_rejects_empty_and_malformed_ids() {
        assert!(matches!(
            TenantDirectory::new([TenantConfig::new("", "Nameless")]),
            Err(TenantError::Invalid(_))
        ));
        assert!(matches!(
            TenantDirectory::new([TenantConfig::new("Empresa Demo", "Bad")]),
            Err(TenantError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = TenantDirectory::new([
            TenantConfig::new("centro-abc", "A"),
            TenantConfig::new("centro-abc", "B"),
        ]);
        assert!(matches!(result, Err(TenantError::Duplicate(id)) if id == "centro-abc"));
    }

    #[test]
    fn test_module_keys_are_normalized() {
        let mut config = TenantConfig::new("centro-abc", "ABC");
        config.modules.insert("Facturacion".to_string(), false);

        let directory = TenantDirectory::new([config]).unwrap();
        let tenant = directory.get("centro-abc").unwrap();
        assert_eq!(tenant.module_state("facturacion"), ModuleState::Disabled);
    }

    #[test]
    fn test_rejects_conflicting_module_keys() {
        let mut config = TenantConfig::new("empresa-demo", "Demo");
        config.modules.insert("Dashboard".to_string(), false);
        config.modules.insert("dashboard".to_string(), true);

        let result = TenantDirectory::new([config]);
        assert!(matches!(result, Err(TenantError::Invalid(ref msg)) if msg.contains("dashboard")));

        let mut agreeing = TenantConfig::new("centro-abc", "ABC");
        agreeing.modules.insert("Citas".to_string(), true);
        agreeing.modules.insert("citas".to_string(), true);
        let directory = TenantDirectory::new([agreeing]).unwrap();
        assert_eq!(directory.get("centro-abc").unwrap().modules.len(), 1);
    }

    #[test]
    fn test_from_value_shapes() {
        let wrapped = TenantDirectory::from_value(json!({
            "tenants": [{ "id": "centro-abc", "name": "Centro ABC" }]
        }))
        .unwrap();
        assert!(wrapped.contains("centro-abc"));

        let bare = TenantDirectory::from_value(json!([
            { "id": "centro-abc", "name": "Centro ABC" }
        ]))
        .unwrap();
        assert_eq!(bare.len(), 1);

        let keyed = TenantDirectory::from_value(json!({
            "empresa-demo": { "name": "Demo", "customModules": ["Home"] }
        }))
        .unwrap();
        assert!(keyed.get("empresa-demo").unwrap().allows_override("Home"));
    }

    #[test]
    fn test_from_value_rejects_garbage() {
        assert!(TenantDirectory::from_value(json!("tenants")).is_err());
        assert!(TenantDirectory::from_value(json!({ "tenants": 3 })).is_err());
        assert!(TenantDirectory::from_value(json!([{ "name": "no id" }])).is_err());
    }
}
