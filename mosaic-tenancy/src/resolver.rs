//! Tenant Resolution
//!
//! Extracts the tenant identifier from a request path such as
//! `/empresa-demo/dashboard` and splits off the remaining route.

use crate::directory::TenantDirectory;
use crate::error::TenantError;
use crate::tenant::TenantConfig;
use regex::Regex;
use std::sync::Arc;

/// Default pattern: first path segment is the tenant, the rest is the route
pub const DEFAULT_PATTERN: &str = r"^/([^/?#]+)(?:/([^?#]*))?";

/// A path split into tenant identifier and tenant-relative route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPath {
    /// Tenant identifier from the path
    pub tenant_id: String,
    /// Route below the tenant, without leading or trailing slashes
    pub route: String,
}

/// Path-based tenant resolver
///
/// Resolves the tenant from the URL path (e.g. `/centro-abc/citas`).
pub struct TenantPathResolver {
    pattern: Regex,
    tenant_group: usize,
    route_group: usize,
}

impl TenantPathResolver {
    /// Create a resolver with a custom pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_tenancy::TenantPathResolver;
    ///
    /// let resolver = TenantPathResolver::new(r"^/t/([^/]+)(?:/(.*))?", 1, 2).unwrap();
    /// let path = resolver.split("/t/centro-abc/citas").unwrap();
    /// assert_eq!(path.tenant_id, "centro-abc");
    /// assert_eq!(path.route, "citas");
    /// ```
    pub fn new(pattern: &str, tenant_group: usize, route_group: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            tenant_group,
            route_group,
        })
    }

    /// Split a path into tenant identifier and route
    pub fn split(&self, path: &str) -> Result<TenantPath, TenantError> {
        let captures = self.pattern.captures(path).ok_or_else(|| {
            TenantError::ResolutionFailed(format!("No tenant segment in path: {}", path))
        })?;

        let tenant_id = captures
            .get(self.tenant_group)
            .ok_or_else(|| TenantError::ResolutionFailed("Tenant capture group not found".to_string()))?
            .as_str()
            .to_string();

        let route = captures
            .get(self.route_group)
            .map(|m| m.as_str().trim_matches('/').to_string())
            .unwrap_or_default();

        Ok(TenantPath { tenant_id, route })
    }

    /// Split a path and look the tenant up in the directory
    pub fn resolve(
        &self,
        directory: &TenantDirectory,
        path: &str,
    ) -> Result<(Arc<TenantConfig>, TenantPath), TenantError> {
        let split = self.split(path)?;
        let tenant = directory.lookup(&split.tenant_id)?;
        Ok((tenant, split))
    }
}

impl Default for TenantPathResolver {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PATTERN).expect("default tenant path pattern is valid"),
            tenant_group: 1,
            route_group: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tenant_home() {
        let resolver = TenantPathResolver::default();
        let path = resolver.split("/empresa-demo").unwrap();
        assert_eq!(path.tenant_id, "empresa-demo");
        assert_eq!(path.route, "");

        let path = resolver.split("/empresa-demo/").unwrap();
        assert_eq!(path.route, "");
    }

    #[test]
    fn test_split_nested_route() {
        let resolver = TenantPathResolver::default();
        let path = resolver
            .split("/sistemas-vaxa/certificaciones/plan/?tab=1")
            .unwrap();
        assert_eq!(path.tenant_id, "sistemas-vaxa");
        assert_eq!(path.route, "certificaciones/plan");
    }

    #[test]
    fn test_split_requires_tenant_segment() {
        let resolver = TenantPathResolver::default();
        assert!(matches!(
            resolver.split("/"),
            Err(TenantError::ResolutionFailed(_))
        ));
        assert!(resolver.split("relative/path").is_err());
    }

    #[test]
    fn test_resolve_against_directory() {
        let directory =
            TenantDirectory::new([TenantConfig::new("centro-abc", "Centro ABC")]).unwrap();
        let resolver = TenantPathResolver::default();

        let (tenant, path) = resolver.resolve(&directory, "/centro-abc/citas").unwrap();
        assert_eq!(tenant.name, "Centro ABC");
        assert_eq!(path.route, "citas");

        let err = resolver.resolve(&directory, "/unknown-co/citas").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(TenantPathResolver::new("(unclosed", 1, 2).is_err());
    }
}
