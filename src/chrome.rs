//! Page chrome selection.

use crate::route::RouteKind;
use serde::{Deserialize, Serialize};

/// Shared page framing around a resolved feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chrome {
    pub show_header: bool,
    pub show_nav: bool,
}

impl Chrome {
    /// Header and navigation
    pub const FULL: Chrome = Chrome {
        show_header: true,
        show_nav: true,
    };

    /// Bare content
    pub const NONE: Chrome = Chrome {
        show_header: false,
        show_nav: false,
    };
}

/// Decides chrome from the route shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeSelector {
    login_segment: String,
}

impl Default for ChromeSelector {
    fn default() -> Self {
        Self::new("login")
    }
}

impl ChromeSelector {
    /// Selector that treats `login_segment` as the authentication route
    pub fn new(login_segment: impl Into<String>) -> Self {
        Self {
            login_segment: login_segment.into(),
        }
    }

    /// Authentication routes never get chrome
    pub fn decide(kind: RouteKind) -> Chrome {
        match kind {
            RouteKind::Authentication => Chrome::NONE,
            RouteKind::Page => Chrome::FULL,
        }
    }

    /// Classify a route: any segment equal to the login segment marks an
    /// authentication route. Query strings and fragments are ignored.
    pub fn classify(&self, route: &str) -> RouteKind {
        let path = route.split(['?', '#']).next().unwrap_or_default();
        if path.split('/').any(|segment| segment == self.login_segment) {
            RouteKind::Authentication
        } else {
            RouteKind::Page
        }
    }

    /// Chrome for a route string
    pub fn chrome_for(&self, route: &str) -> Chrome {
        Self::decide(self.classify(route))
    }
}

/// Chrome for a route string, with `login` as the authentication segment.
///
/// ```
/// use mosaic::{Chrome, chrome_for};
///
/// assert_eq!(chrome_for("login"), Chrome::NONE);
/// assert_eq!(chrome_for("/empresa-techpro/login"), Chrome::NONE);
/// assert_eq!(chrome_for("dashboard"), Chrome::FULL);
/// ```
pub fn chrome_for(route: &str) -> Chrome {
    ChromeSelector::default().chrome_for(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide() {
        assert_eq!(ChromeSelector::decide(RouteKind::Authentication), Chrome::NONE);
        assert_eq!(ChromeSelector::decide(RouteKind::Page), Chrome::FULL);
    }

    #[test]
    fn test_everything_else_gets_chrome() {
        for route in ["", "dashboard", "citas", "certificaciones/plan", "logins", "my-login"] {
            assert_eq!(chrome_for(route), Chrome::FULL, "route {:?}", route);
        }
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        for route in ["login?next=/x", "login#form", "/empresa-techpro/login?next=%2Fdashboard"] {
            assert_eq!(chrome_for(route), Chrome::NONE, "route {:?}", route);
        }
        assert_eq!(chrome_for("dashboard?tab=login"), Chrome::FULL);
        assert_eq!(chrome_for("citas#login"), Chrome::FULL);
    }

    #[test]
    fn test_custom_segment() {
        let selector = ChromeSelector::new("ingresar");
        assert_eq!(selector.chrome_for("ingresar"), Chrome::NONE);
        assert_eq!(selector.chrome_for("login"), Chrome::FULL);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Chrome::NONE).unwrap();
        assert_eq!(json, serde_json::json!({ "showHeader": false, "showNav": false }));
    }
}
