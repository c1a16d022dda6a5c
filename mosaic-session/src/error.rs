//! Error types for session operations.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A marker could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored marker could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The backing store failed
    #[error("Session backend error: {0}")]
    Backend(String),

    /// Tenant identifier cannot key a session marker
    #[error("Invalid tenant for session: {0}")]
    InvalidTenant(String),

    /// Generic error
    #[error("Session error: {0}")]
    Other(String),
}
