//! Credentials: access tokens for authors and password hashing.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Who a verified token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    /// Seconds until the token stops verifying.
    pub lifetime_secs: i64,
}

/// Issues and verifies author access tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError>;

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// One-way password hashing.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` for a wrong password, `Err` only for an unreadable hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No credentials supplied")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Malformed credentials: {0}")]
    Malformed(String),

    #[error("Could not sign token: {0}")]
    Signing(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
