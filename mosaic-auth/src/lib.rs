//! Decides whether a guarded feature may render for a tenant.
//!
//! Tenants that do not require login are always let through. For tenants
//! that do, the gate reads the tenant's session marker and either allows
//! the entry or redirects to the tenant's login route, rendering nothing.
//!
//! ```
//! use mosaic_auth::*;
//! use mosaic_session::{InMemorySessionStore, Session, SessionStore};
//! use mosaic_tenancy::TenantConfig;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(InMemorySessionStore::new());
//! let gate = AccessGate::new(store.clone());
//! let tenant = TenantConfig::new("empresa-techpro", "TechPro").with_login_required(true);
//!
//! let entry = gate.enter(&tenant, true).await;
//! assert_eq!(entry.render(|| "dashboard"), None);
//!
//! store.write(&Session::authenticated("empresa-techpro", "ana")).await.unwrap();
//! assert_eq!(gate.check_access(&tenant, true).await, GateState::Authenticated);
//! # });
//! ```

pub mod error;
pub mod gate;
pub mod guard;

pub use error::{AuthError, Result};
pub use gate::{AccessGate, DEFAULT_LOGIN_SEGMENT, GateDecision, decide};
pub use guard::{GateState, GuardedEntry};
