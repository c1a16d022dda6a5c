//! Mosaic - tenant-aware feature resolution and access gating
//!
//! One deployment serves several tenants. For each request Mosaic decides
//! which implementation of a feature renders (shared default or a tenant's
//! allow-listed override), whether the tenant switched it off, and whether
//! the caller needs to sign in first.
//!
//! # Features
//!
//! - 🏢 **Tenant Directory** - Immutable tenant configuration, loaded once
//! - 🧩 **Feature Overrides** - Per-tenant implementations behind an allow-list
//! - 🔐 **Access Gate** - Login enforcement with tenant-scoped sessions
//! - 🖼️ **Chrome Selection** - No header or navigation on login routes
//! - 🧭 **Request Pipeline** - `/{tenant}/{route}` to a render plan
//! - ⏹️ **Stale Render Protection** - Superseded navigations are dropped
//!
//! # Quick Start
//!
//! ```
//! use mosaic::prelude::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let directory = TenantDirectory::new([
//!     TenantConfig::new("centro-abc", "Centro ABC").with_module("facturacion", true),
//! ])
//! .unwrap();
//!
//! let catalog = CatalogBuilder::new()
//!     .with_feature("Home", FeatureKind::Page, "core/Home")
//!     .with_feature("Facturacion", FeatureKind::Page, "core/Facturacion")
//!     .build()
//!     .unwrap();
//!
//! let platform = Platform::builder(PlatformSettings::default())
//!     .with_directory(directory)
//!     .with_catalog(Arc::new(catalog))
//!     .build()
//!     .unwrap();
//!
//! let outcome = platform.handle("/centro-abc/facturacion").await.unwrap();
//! let plan = outcome.plan().unwrap();
//! assert_eq!(plan.resolution.implementation.id, "core/Facturacion");
//! assert_eq!(plan.chrome, Chrome::FULL);
//! # });
//! ```

pub mod chrome;
pub mod error;
pub mod platform;
pub mod render;
pub mod route;

pub use chrome::{Chrome, ChromeSelector, chrome_for};
pub use error::{PlatformError, Result};
pub use platform::{Platform, PlatformBuilder};
pub use render::{
    CommitStatus, PageOutcome, PresentationSurface, RenderPlan, RenderTarget, RenderTicket,
};
pub use route::{CONSOLE_TENANT, RouteEntry, RouteKind, RouteTable};

// Re-export member crates
pub use mosaic_auth;
pub use mosaic_config;
pub use mosaic_features;
pub use mosaic_log;
pub use mosaic_session;
pub use mosaic_tenancy;

// Prelude for common imports
pub mod prelude {
    pub use crate::chrome::{Chrome, ChromeSelector, chrome_for};
    pub use crate::error::PlatformError;
    pub use crate::platform::Platform;
    pub use crate::render::{
        CommitStatus, PageOutcome, PresentationSurface, RenderPlan, RenderTarget,
    };
    pub use crate::route::{RouteEntry, RouteKind, RouteTable};
    pub use mosaic_auth::{AccessGate, GateDecision, GateState};
    pub use mosaic_config::PlatformSettings;
    pub use mosaic_features::{
        CatalogBuilder, FeatureInput, FeatureKind, FeatureResolver, ImplementationRef,
        Provenance, ResolutionResult, ResolveError,
    };
    pub use mosaic_session::{InMemorySessionStore, Session, SessionStore};
    pub use mosaic_tenancy::{TenantConfig, TenantDirectory};
}
