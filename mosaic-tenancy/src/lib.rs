//! Tenancy for Mosaic
//!
//! Tenant configuration, the immutable tenant directory, and path-based
//! tenant resolution.
//!
//! # Features
//!
//! - 🏢 **Tenant Configuration** - Modules, override allow-list, login requirement
//! - 📒 **Tenant Directory** - Immutable lookup built once at startup
//! - 🔍 **Path Resolution** - `/{tenant}/{route}` request paths
//! - 📄 **File Loading** - JSON or TOML tenant documents
//!
//! # Quick Start
//!
//! ```
//! use mosaic_tenancy::*;
//!
//! let directory = TenantDirectory::new([
//!     TenantConfig::new("empresa-demo", "Centro de Terapia Demo")
//!         .with_module("facturacion", false)
//!         .with_custom_feature("Dashboard"),
//! ])
//! .unwrap();
//!
//! let resolver = TenantPathResolver::default();
//! let (tenant, path) = resolver.resolve(&directory, "/empresa-demo/dashboard").unwrap();
//!
//! assert_eq!(path.route, "dashboard");
//! assert_eq!(tenant.module_state("Facturacion"), ModuleState::Disabled);
//! ```

pub mod directory;
pub mod error;
pub mod resolver;
pub mod tenant;

pub use directory::TenantDirectory;
pub use error::TenantError;
pub use resolver::{TenantPath, TenantPathResolver};
pub use tenant::{ModuleState, TenantConfig, module_key};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::directory::TenantDirectory;
    pub use crate::error::TenantError;
    pub use crate::resolver::{TenantPath, TenantPathResolver};
    pub use crate::tenant::{ModuleState, TenantConfig};
}
