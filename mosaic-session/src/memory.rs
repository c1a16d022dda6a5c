//! In-memory session storage.

use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::traits::{Session, SessionStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Session store backed by a process-local key/value map.
///
/// Markers are kept in the same flat key layout a browser-side store
/// would use, so raw entries can be inspected or seeded directly.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    config: SessionConfig,
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    /// Create a store with the default key layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a custom configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Key layout used by this store
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Raw value stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// Store a raw value under `key`.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Number of raw entries held
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn read(&self, tenant_id: &str) -> SessionResult<Option<Session>> {
        let entries = self.entries.read();
        self.config
            .decode(tenant_id, |key| entries.get(key).cloned())
    }

    async fn write(&self, session: &Session) -> SessionResult<()> {
        let encoded = self.config.encode(session)?;

        let mut entries = self.entries.write();
        for key in self.config.keys(&session.tenant_id) {
            entries.remove(&key);
        }
        entries.extend(encoded);

        mosaic_log::debug!(
            target: "mosaic::session",
            "session written";
            tenant = session.tenant_id,
            authenticated = session.authenticated
        );
        Ok(())
    }

    async fn clear(&self, tenant_id: &str) -> SessionResult<()> {
        let mut entries = self.entries.write();
        for key in self.config.keys(tenant_id) {
            entries.remove(&key);
        }

        mosaic_log::debug!(target: "mosaic::session", "session cleared"; tenant = tenant_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;

    #[tokio::test]
    async fn test_write_and_read() {
        let store = InMemorySessionStore::new();
        let session = Session::authenticated("empresa-techpro", "ana@techpro.example");

        store.write(&session).await.unwrap();

        assert_eq!(store.raw("auth_empresa-techpro").as_deref(), Some("true"));
        assert_eq!(
            store.raw("auth_user_empresa-techpro").as_deref(),
            Some("ana@techpro.example")
        );
        assert_eq!(store.read("empresa-techpro").await.unwrap(), Some(session));
        assert!(store.is_authenticated("empresa-techpro").await.unwrap());
    }

    #[tokio::test]
    async fn test_sessions_are_tenant_scoped() {
        let store = InMemorySessionStore::new();
        store
            .write(&Session::authenticated("empresa-techpro", "ana"))
            .await
            .unwrap();

        assert!(store.read("centro-abc").await.unwrap().is_none());
        assert!(!store.is_authenticated("centro-abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_removes_all_keys() {
        let store = InMemorySessionStore::new();
        store
            .write(&Session::authenticated("empresa-techpro", "ana").with_ttl(std::time::Duration::from_secs(30)))
            .await
            .unwrap();
        assert_eq!(store.len(), 3);

        store.clear("empresa-techpro").await.unwrap();
        assert!(store.is_empty());
        assert!(!store.is_authenticated("empresa-techpro").await.unwrap());
    }

    #[tokio::test]
    async fn test_rewrite_drops_stale_identity() {
        let store = InMemorySessionStore::new();
        store
            .write(&Session::authenticated("centro-abc", "old"))
            .await
            .unwrap();
        store.write(&Session::anonymous("centro-abc")).await.unwrap();

        assert_eq!(store.raw("auth_centro-abc").as_deref(), Some("false"));
        assert!(store.raw("auth_user_centro-abc").is_none());
    }

    #[tokio::test]
    async fn test_seeded_raw_marker() {
        let store = InMemorySessionStore::new();
        store.insert_raw("auth_centro-abc", "true");
        assert!(store.is_authenticated("centro-abc").await.unwrap());

        store.insert_raw("auth_centro-abc", "1");
        assert!(matches!(
            store.read("centro-abc").await,
            Err(SessionError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_custom_namespace() {
        let store = InMemorySessionStore::with_config(SessionConfig::default().with_namespace("sesion"));
        store
            .write(&Session::authenticated("centro-abc", "u"))
            .await
            .unwrap();
        assert_eq!(store.raw("sesion_centro-abc").as_deref(), Some("true"));
        assert_eq!(store.config().namespace, "sesion");
    }
}
