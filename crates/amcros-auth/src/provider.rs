//! Identity provider: sign-up, sign-in and the auth-state feed.

use crate::{AuthError, AuthSession, AuthState, PasswordHasher};
use amcros_commerce::Email;
use amcros_store::{Collection, DocumentStore, DocumentStoreExt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Email/password identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self);

    /// Re-establish a previously issued session, failing if the account is gone.
    async fn restore(&self, session: AuthSession) -> Result<AuthSession, AuthError>;

    fn current(&self) -> Option<AuthSession>;

    /// Auth-state subscription. The receiver sees the latest state immediately.
    fn watch(&self) -> watch::Receiver<AuthState>;
}

/// Stored credential record, keyed by email in the `credentials` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Credential {
    uid: String,
    email: Email,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Identity provider backed by the document store.
pub struct StoreIdentityProvider<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    hasher: PasswordHasher,
    state: watch::Sender<AuthState>,
}

impl<S: DocumentStore + ?Sized> StoreIdentityProvider<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_hasher(store, PasswordHasher::default())
    }

    pub fn with_hasher(store: Arc<S>, hasher: PasswordHasher) -> Self {
        let (state, _) = watch::channel(AuthState::SignedOut);
        Self {
            store,
            hasher,
            state,
        }
    }

    async fn credential(&self, email: &Email) -> Result<Option<Credential>, AuthError> {
        Ok(self
            .store
            .get_as::<Credential>(Collection::Credentials, email.as_str())
            .await?)
    }

    fn publish(&self, state: AuthState) {
        self.state.send_replace(state);
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> IdentityProvider for StoreIdentityProvider<S> {
    #[tracing::instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email)?;
        PasswordHasher::validate_password(password)?;

        if self.credential(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists(email.into_inner()));
        }

        let credential = Credential {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            email: email.clone(),
            password_hash: self.hasher.hash(password)?,
            created_at: Utc::now(),
        };
        self.store
            .set_as(Collection::Credentials, email.as_str(), &credential)
            .await?;

        let session = AuthSession::new(credential.uid, email);
        tracing::info!(email = %session.email, "account created");
        self.publish(AuthState::SignedIn(session.clone()));
        Ok(session)
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email)?;
        let Some(credential) = self.credential(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &credential.password_hash)? {
            tracing::warn!(%email, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let session = AuthSession::new(credential.uid, email);
        self.publish(AuthState::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) {
        self.publish(AuthState::SignedOut);
    }

    async fn restore(&self, session: AuthSession) -> Result<AuthSession, AuthError> {
        match self.credential(&session.email).await? {
            Some(credential) if credential.uid == session.uid => {
                self.publish(AuthState::SignedIn(session.clone()));
                Ok(session)
            }
            _ => {
                self.publish(AuthState::SignedOut);
                Err(AuthError::SessionExpired)
            }
        }
    }

    fn current(&self) -> Option<AuthSession> {
        self.state.borrow().session().cloned()
    }

    fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcros_store::MemoryStore;

    fn provider() -> StoreIdentityProvider<MemoryStore> {
        StoreIdentityProvider::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = provider();
        let created = auth.sign_up(" Owner@Mill.in ", "socks123").await.unwrap();
        assert_eq!(created.email.as_str(), "owner@mill.in");

        auth.sign_out().await;
        assert!(auth.current().is_none());

        let session = auth.sign_in("owner@mill.in", "socks123").await.unwrap();
        assert_eq!(session.uid, created.uid);
        assert_eq!(auth.current(), Some(session));
    }

    #[tokio::test]
    async fn test_duplicate_and_weak_sign_up() {
        let auth = provider();
        auth.sign_up("a@b.in", "socks123").await.unwrap();
        assert!(matches!(
            auth.sign_up("A@B.IN", "other123").await,
            Err(AuthError::UserAlreadyExists(_))
        ));
        assert!(matches!(
            auth.sign_up("c@d.in", "123").await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.sign_up("not-an-email", "socks123").await,
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let auth = provider();
        auth.sign_up("a@b.in", "socks123").await.unwrap();
        let wrong = auth.sign_in("a@b.in", "nope123").await.unwrap_err();
        let unknown = auth.sign_in("x@y.in", "socks123").await.unwrap_err();
        assert!(wrong.is_auth_failure());
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_watch_reports_transitions() {
        let auth = provider();
        let mut rx = auth.watch();
        assert!(!rx.borrow().is_signed_in());

        auth.sign_up("a@b.in", "socks123").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_signed_in());

        auth.sign_out().await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_restore() {
        let store = Arc::new(MemoryStore::new());
        let first = StoreIdentityProvider::new(store.clone());
        let session = first.sign_up("a@b.in", "socks123").await.unwrap();

        let second = StoreIdentityProvider::new(store.clone());
        assert_eq!(second.restore(session.clone()).await.unwrap(), session);
        assert!(second.current().is_some());

        let mut forged = session;
        forged.uid = "someone-else".to_string();
        assert!(matches!(
            second.restore(forged).await,
            Err(AuthError::SessionExpired)
        ));
        assert!(second.current().is_none());
    }
}
