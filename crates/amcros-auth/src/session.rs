//! Session values handed to the rest of the app.

use amcros_commerce::Email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in identity.
///
/// Services take this explicitly; nothing reads the current user from a
/// global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Provider-assigned user id.
    pub uid: String,
    pub email: Email,
    pub signed_in_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(uid: impl Into<String>, email: Email) -> Self {
        Self {
            uid: uid.into(),
            email,
            signed_in_at: Utc::now(),
        }
    }

    /// The key of this user's document in the `users` collection.
    pub fn user_key(&self) -> &str {
        self.email.as_str()
    }
}

/// What the auth-state subscription reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(AuthSession),
}

impl AuthState {
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            AuthState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }
}
