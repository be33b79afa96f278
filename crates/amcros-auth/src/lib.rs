//! Authentication module for Amcros Connect.
//!
//! Email/password accounts with Argon2 hashes kept in the document store,
//! explicit session values, and a watch channel for auth-state changes.

mod error;
mod password;
mod provider;
mod session;

pub use error::AuthError;
pub use password::{PasswordHasher, MIN_PASSWORD_LENGTH};
pub use provider::{IdentityProvider, StoreIdentityProvider};
pub use session::{AuthSession, AuthState};
