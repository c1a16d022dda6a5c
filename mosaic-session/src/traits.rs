//! Session store trait definition.

use crate::error::SessionResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-tenant session marker.
///
/// Authentication is scoped to a single tenant: a session established
/// under one tenant says nothing about any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Tenant the session belongs to
    pub tenant_id: String,
    /// Authenticated flag
    pub authenticated: bool,
    /// Opaque user identity
    pub identity: Option<String>,
    /// Session expiration timestamp
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create an authenticated session for a tenant.
    pub fn authenticated(tenant_id: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            authenticated: true,
            identity: Some(identity.into()),
            expires_at: None,
        }
    }

    /// Create a session marker that is explicitly not authenticated.
    pub fn anonymous(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            authenticated: false,
            identity: None,
            expires_at: None,
        }
    }

    /// Expire the session after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .map(|ttl| Utc::now() + ttl);
        self
    }

    /// Expire the session at a fixed instant.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }

    /// Authenticated and not expired.
    pub fn is_valid(&self) -> bool {
        self.authenticated && !self.is_expired()
    }

    /// User identity, if recorded.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

/// Session store trait for different storage backends.
///
/// Stores hold at most one marker per tenant. Reads of a tenant that has
/// never signed in return `Ok(None)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the marker for a tenant.
    async fn read(&self, tenant_id: &str) -> SessionResult<Option<Session>>;

    /// Write (or replace) the marker for `session.tenant_id`.
    async fn write(&self, session: &Session) -> SessionResult<()>;

    /// Remove the marker for a tenant.
    async fn clear(&self, tenant_id: &str) -> SessionResult<()>;

    /// Whether a valid authenticated session exists for the tenant.
    async fn is_authenticated(&self, tenant_id: &str) -> SessionResult<bool> {
        Ok(self
            .read(tenant_id)
            .await?
            .is_some_and(|session| session.is_valid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_session() {
        let session = Session::authenticated("empresa-techpro", "ana@techpro.example");
        assert!(session.is_valid());
        assert!(!session.is_expired());
        assert_eq!(session.identity(), Some("ana@techpro.example"));
    }

    #[test]
    fn test_anonymous_session_is_not_valid() {
        let session = Session::anonymous("empresa-techpro");
        assert!(!session.is_valid());
        assert_eq!(session.identity(), None);
    }

    #[test]
    fn test_expired_session_is_not_valid() {
        let session = Session::authenticated("centro-abc", "user")
            .with_expiry(Utc::now() - chrono::Duration::seconds(5));
        assert!(session.is_expired());
        assert!(!session.is_valid());

        let session = Session::authenticated("centro-abc", "user").with_ttl(Duration::from_secs(60));
        assert!(session.is_valid());
    }
}
