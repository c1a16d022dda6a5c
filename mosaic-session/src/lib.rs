//! Session storage for Mosaic.
//!
//! Per-tenant authentication markers. A session established under one
//! tenant never authenticates another.
//!
//! # Features
//!
//! - 🔑 **Tenant-scoped markers** - `auth_{tenant}` / `auth_user_{tenant}` key layout
//! - ⏱️ **Expiry** - Optional per-session or default TTL
//! - 🧠 **In-memory store** - Process-local backend for tests and single-node use
//!
//! # Examples
//!
//! ```
//! use mosaic_session::*;
//!
//! # tokio_test::block_on(async {
//! let store = InMemorySessionStore::new();
//!
//! store
//!     .write(&Session::authenticated("empresa-techpro", "ana@techpro.example"))
//!     .await?;
//!
//! assert!(store.is_authenticated("empresa-techpro").await?);
//! assert!(!store.is_authenticated("centro-abc").await?);
//!
//! store.clear("empresa-techpro").await?;
//! assert!(store.read("empresa-techpro").await?.is_none());
//! # Ok::<(), SessionError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use memory::InMemorySessionStore;
pub use traits::{Session, SessionStore};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::memory::InMemorySessionStore;
    pub use crate::traits::{Session, SessionStore};
}
