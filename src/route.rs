//! Tenant-relative route table.

use mosaic_features::FeatureKind;
use std::collections::BTreeMap;

/// Tenant that owns the system console routes
pub const CONSOLE_TENANT: &str = "sistemas-vaxa";

/// Shape of a route, as seen by the chrome selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Regular tenant page
    Page,
    /// Authentication entry point
    Authentication,
}

/// A tenant-relative route and the feature it renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Route below the tenant, without surrounding slashes
    pub path: String,
    /// Feature rendered by the route
    pub feature: String,
    /// Input contract of the feature
    pub kind: FeatureKind,
    /// Whether the access gate runs before resolution
    pub guarded: bool,
    /// Tenant the route is reserved for; others are sent home
    pub exclusive_to: Option<String>,
    /// System administered by a console route
    pub system_slug: Option<String>,
}

impl RouteEntry {
    /// Guarded page route
    pub fn page(path: &str, feature: &str) -> Self {
        Self {
            path: normalize(path),
            feature: feature.to_string(),
            kind: FeatureKind::Page,
            guarded: true,
            exclusive_to: None,
            system_slug: None,
        }
    }

    /// Unguarded login route
    pub fn login(path: &str, feature: &str) -> Self {
        Self {
            kind: FeatureKind::Login,
            guarded: false,
            ..Self::page(path, feature)
        }
    }

    /// Guarded console route reserved for `tenant`.
    ///
    /// The system slug is the route's first segment.
    pub fn console(path: &str, feature: &str, tenant: &str) -> Self {
        let path = normalize(path);
        let slug = path.split('/').next().unwrap_or_default().to_string();
        Self {
            kind: FeatureKind::Console,
            exclusive_to: Some(tenant.to_string()),
            system_slug: Some(slug),
            ..Self::page(&path, feature)
        }
    }

    /// Override the guard flag
    pub fn with_guarded(mut self, guarded: bool) -> Self {
        self.guarded = guarded;
        self
    }

    /// Route shape for chrome selection
    pub fn route_kind(&self) -> RouteKind {
        match self.kind {
            FeatureKind::Login => RouteKind::Authentication,
            FeatureKind::Page | FeatureKind::Console => RouteKind::Page,
        }
    }

    /// Whether `tenant_id` may use this route
    pub fn admits(&self, tenant_id: &str) -> bool {
        self.exclusive_to.as_deref().is_none_or(|owner| owner == tenant_id)
    }
}

/// Route lookup for tenant-relative paths.
///
/// # Examples
///
/// ```
/// use mosaic::{RouteKind, RouteTable};
///
/// let routes = RouteTable::standard("login");
///
/// assert_eq!(routes.lookup("").unwrap().feature, "Home");
/// assert_eq!(routes.lookup("/citas/").unwrap().feature, "Citas");
/// assert_eq!(routes.lookup("login").unwrap().route_kind(), RouteKind::Authentication);
/// assert!(routes.lookup("reportes").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: BTreeMap<String, RouteEntry>,
}

impl RouteTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard table, with the login entry point at `login_segment`
    pub fn standard(login_segment: &str) -> Self {
        Self::new()
            .with_route(RouteEntry::page("", "Home"))
            .with_route(RouteEntry::page("dashboard", "Dashboard"))
            .with_route(RouteEntry::page("pacientes", "Pacientes"))
            .with_route(RouteEntry::page("citas", "Citas"))
            .with_route(RouteEntry::page("terapeutas", "Terapeutas"))
            .with_route(RouteEntry::page("facturacion", "Facturacion"))
            .with_route(RouteEntry::login(login_segment, "Login"))
            .with_route(RouteEntry::console(
                "usuarios",
                "UsuariosSistemasVaxa",
                CONSOLE_TENANT,
            ))
            .with_route(RouteEntry::console(
                "certificaciones/plan",
                "PlanSistema",
                CONSOLE_TENANT,
            ))
            .with_route(RouteEntry::console(
                "certificaciones/usuarios",
                "UsuariosSistema",
                CONSOLE_TENANT,
            ))
            .with_route(RouteEntry::console(
                "certificaciones/elementos",
                "ElementosSistema",
                CONSOLE_TENANT,
            ))
    }

    /// Add or replace a route
    pub fn with_route(mut self, entry: RouteEntry) -> Self {
        self.entries.insert(entry.path.clone(), entry);
        self
    }

    /// Route for a tenant-relative path
    pub fn lookup(&self, route: &str) -> Option<&RouteEntry> {
        self.entries.get(&normalize(route))
    }

    /// All routes in path order
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(route: &str) -> String {
    route.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let routes = RouteTable::standard("login");
        assert_eq!(routes.len(), 11);

        let home = routes.lookup("/").unwrap();
        assert_eq!(home.feature, "Home");
        assert!(home.guarded);

        let login = routes.lookup("login").unwrap();
        assert_eq!(login.kind, FeatureKind::Login);
        assert!(!login.guarded);
    }

    #[test]
    fn test_console_routes() {
        let routes = RouteTable::standard("login");
        let plan = routes.lookup("certificaciones/plan").unwrap();

        assert_eq!(plan.feature, "PlanSistema");
        assert_eq!(plan.system_slug.as_deref(), Some("certificaciones"));
        assert!(plan.admits(CONSOLE_TENANT));
        assert!(!plan.admits("empresa-demo"));
        assert_eq!(plan.route_kind(), RouteKind::Page);

        let users = routes.lookup("usuarios").unwrap();
        assert_eq!(users.feature, "UsuariosSistemasVaxa");
        assert_eq!(users.system_slug.as_deref(), Some("usuarios"));
    }

    #[test]
    fn test_custom_login_segment() {
        let routes = RouteTable::standard("ingresar");
        assert!(routes.lookup("login").is_none());
        assert_eq!(routes.lookup("ingresar").unwrap().feature, "Login");
    }

    #[test]
    fn test_with_route_replaces() {
        let routes = RouteTable::standard("login")
            .with_route(RouteEntry::page("citas", "Agenda").with_guarded(false));
        let citas = routes.lookup("citas").unwrap();
        assert_eq!(citas.feature, "Agenda");
        assert!(!citas.guarded);
        assert!(citas.admits("centro-abc"));
    }
}
