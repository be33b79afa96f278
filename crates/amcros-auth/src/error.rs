//! Authentication errors.

use amcros_commerce::EmailError;
use amcros_store::StoreError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// A restored session no longer matches a stored account.
    #[error("session expired")]
    SessionExpired,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Malformed email address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Credentials could not be read or written.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::SessionExpired | AuthError::NotSignedIn
        )
    }

    /// Problems with what the user typed, as opposed to infrastructure failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AuthError::UserAlreadyExists(_) | AuthError::WeakPassword(_) | AuthError::InvalidEmail(_)
        )
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Store(StoreError::Serialization(e))
    }
}
