//! Session marker layout.

use crate::error::{SessionError, SessionResult};
use crate::traits::Session;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Session configuration and persisted key layout.
///
/// Markers are stored per tenant under three keys:
///
/// | key                          | value                         |
/// |------------------------------|-------------------------------|
/// | `{namespace}_{tenant}`       | `"true"` when authenticated   |
/// | `{namespace}_user_{tenant}`  | opaque identity string        |
/// | `{namespace}_expires_{tenant}` | RFC 3339 expiry (optional)  |
///
/// Tenant identifiers are slugs without `_`, so the keys cannot collide.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Key prefix
    pub namespace: String,
    /// TTL applied to sessions that do not carry their own expiry
    pub default_ttl: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: "auth".to_string(),
            default_ttl: None,
        }
    }
}

impl SessionConfig {
    /// Set the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the default session TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Key of the authenticated flag.
    ///
    /// ```
    /// use mosaic_session::SessionConfig;
    ///
    /// let config = SessionConfig::default();
    /// assert_eq!(config.flag_key("empresa-techpro"), "auth_empresa-techpro");
    /// assert_eq!(config.identity_key("empresa-techpro"), "auth_user_empresa-techpro");
    /// ```
    pub fn flag_key(&self, tenant_id: &str) -> String {
        format!("{}_{}", self.namespace, tenant_id)
    }

    /// Key of the identity string.
    pub fn identity_key(&self, tenant_id: &str) -> String {
        format!("{}_user_{}", self.namespace, tenant_id)
    }

    /// Key of the optional expiry timestamp.
    pub fn expiry_key(&self, tenant_id: &str) -> String {
        format!("{}_expires_{}", self.namespace, tenant_id)
    }

    /// All keys belonging to a tenant's marker.
    pub fn keys(&self, tenant_id: &str) -> [String; 3] {
        [
            self.flag_key(tenant_id),
            self.identity_key(tenant_id),
            self.expiry_key(tenant_id),
        ]
    }

    /// Encode a session as key/value pairs.
    pub fn encode(&self, session: &Session) -> SessionResult<Vec<(String, String)>> {
        check_tenant(&session.tenant_id)?;

        let mut entries = vec![(
            self.flag_key(&session.tenant_id),
            session.authenticated.to_string(),
        )];

        if let Some(identity) = session.identity() {
            entries.push((self.identity_key(&session.tenant_id), identity.to_string()));
        }

        let expires_at = session.expires_at.or_else(|| {
            self.default_ttl
                .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
                .map(|ttl| Utc::now() + ttl)
        });
        if let Some(expires_at) = expires_at {
            entries.push((self.expiry_key(&session.tenant_id), expires_at.to_rfc3339()));
        }

        Ok(entries)
    }

    /// Decode a tenant's marker; `None` when no flag is stored.
    pub fn decode(
        &self,
        tenant_id: &str,
        get: impl Fn(&str) -> Option<String>,
    ) -> SessionResult<Option<Session>> {
        check_tenant(tenant_id)?;

        let Some(flag) = get(&self.flag_key(tenant_id)) else {
            return Ok(None);
        };

        let authenticated = match flag.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(SessionError::Deserialization(format!(
                    "authenticated flag must be true or false, got '{}'",
                    other
                )));
            }
        };

        let expires_at = get(&self.expiry_key(tenant_id))
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| SessionError::Deserialization(format!("expiry: {}", e)))
            })
            .transpose()?;

        Ok(Some(Session {
            tenant_id: tenant_id.to_string(),
            authenticated,
            identity: get(&self.identity_key(tenant_id)),
            expires_at,
        }))
    }
}

fn check_tenant(tenant_id: &str) -> SessionResult<()> {
    if tenant_id.is_empty() || tenant_id.contains('_') {
        return Err(SessionError::InvalidTenant(tenant_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn decode_from(
        config: &SessionConfig,
        tenant: &str,
        map: &HashMap<String, String>,
    ) -> SessionResult<Option<Session>> {
        config.decode(tenant, |key| map.get(key).cloned())
    }

    #[test]
    fn test_key_layout() {
        let config = SessionConfig::default().with_namespace("sesion");
        assert_eq!(config.flag_key("centro-abc"), "sesion_centro-abc");
        assert_eq!(config.identity_key("centro-abc"), "sesion_user_centro-abc");
        assert_eq!(config.expiry_key("centro-abc"), "sesion_expires_centro-abc");
    }

    #[test]
    fn test_encode_decode_authenticated() {
        let config = SessionConfig::default();
        let session = Session::authenticated("empresa-techpro", "ana@techpro.example");

        let map: HashMap<_, _> = config.encode(&session).unwrap().into_iter().collect();
        assert_eq!(map.get("auth_empresa-techpro"), Some(&"true".to_string()));
        assert_eq!(
            map.get("auth_user_empresa-techpro"),
            Some(&"ana@techpro.example".to_string())
        );
        assert!(!map.contains_key("auth_expires_empresa-techpro"));

        let decoded = decode_from(&config, "empresa-techpro", &map).unwrap().unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn test_default_ttl_stamps_expiry() {
        let config = SessionConfig::default().with_default_ttl(Duration::from_secs(60));
        let session = Session::authenticated("centro-abc", "user");

        let map: HashMap<_, _> = config.encode(&session).unwrap().into_iter().collect();
        let decoded = decode_from(&config, "centro-abc", &map).unwrap().unwrap();
        assert!(decoded.expires_at.is_some());
        assert!(decoded.is_valid());
    }

    #[test]
    fn test_decode_absent_marker() {
        let config = SessionConfig::default();
        let map = HashMap::new();
        assert!(decode_from(&config, "centro-abc", &map).unwrap().is_none());
    }

    #[test]
    fn test_decode_rejects_malformed_values() {
        let config = SessionConfig::default();

        let mut map = HashMap::new();
        map.insert("auth_centro-abc".to_string(), "yes".to_string());
        assert!(matches!(
            decode_from(&config, "centro-abc", &map),
            Err(SessionError::Deserialization(_))
        ));

        map.insert("auth_centro-abc".to_string(), "true".to_string());
        map.insert("auth_expires_centro-abc".to_string(), "tomorrow".to_string());
        assert!(decode_from(&config, "centro-abc", &map).is_err());
    }

    #[test]
    fn test_rejects_unkeyable_tenants() {
        let config = SessionConfig::default();
        assert!(matches!(
            config.encode(&Session::authenticated("bad_tenant", "x")),
            Err(SessionError::InvalidTenant(_))
        ));
        assert!(config.decode("", |_| None).is_err());
    }
}
