// Error types for access gating

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Gate already settled")]
    AlreadySettled,

    #[error("Tenant does not enforce login: {0}")]
    LoginNotEnforced(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
