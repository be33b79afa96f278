//! Signed-in sessions and the account service.

use crate::{AppError, AppResult};
use amcros_auth::{AuthSession, IdentityProvider};
use amcros_commerce::profile::{Role, SignUpDetails, UserProfile};
use amcros_commerce::Email;
use amcros_store::{Collection, DocumentStore, DocumentStoreExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// The explicit identity every user-scoped service takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub auth: AuthSession,
    pub profile: UserProfile,
}

impl Session {
    pub fn email(&self) -> &Email {
        &self.auth.email
    }

    /// Key of the user's document in `users`.
    pub fn user_key(&self) -> &str {
        self.auth.user_key()
    }

    pub fn is_admin(&self) -> bool {
        self.profile.is_admin()
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Sign-up, sign-in and profile re-hydration.
pub struct Accounts {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    admins: Vec<Email>,
}

impl Accounts {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            store,
            admins: Vec::new(),
        }
    }

    /// Grant the admin role to these emails when they sign up or sign in.
    pub fn with_admins(mut self, admins: Vec<Email>) -> Self {
        self.admins = admins;
        self
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    fn role_for(&self, email: &Email) -> Role {
        if self.admins.contains(email) {
            Role::Admin
        } else {
            Role::Customer
        }
    }

    /// Create the account and write its user document.
    #[instrument(skip(self, password, details))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        details: SignUpDetails,
    ) -> AppResult<Session> {
        details.validate()?;
        let auth = self.identity.sign_up(email, password).await?;

        let mut profile = UserProfile::from_sign_up(auth.email.clone(), auth.uid.clone(), details);
        profile.role = self.role_for(&auth.email);
        self.store
            .set_as(Collection::Users, auth.user_key(), &profile)
            .await?;

        tracing::info!(email = %auth.email, role = profile.role.as_str(), "user signed up");
        Ok(Session { auth, profile })
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let auth = self.identity.sign_in(email, password).await?;
        self.hydrate(auth).await
    }

    /// Re-establish a session saved by a previous run.
    pub async fn restore(&self, auth: AuthSession) -> AppResult<Session> {
        let auth = self.identity.restore(auth).await?;
        self.hydrate(auth).await
    }

    /// Reload the profile for a session, picking up remote edits.
    pub async fn refresh(&self, session: &Session) -> AppResult<Session> {
        self.hydrate(session.auth.clone()).await
    }

    pub async fn sign_out(&self) {
        self.identity.sign_out().await;
    }

    async fn hydrate(&self, auth: AuthSession) -> AppResult<Session> {
        let mut profile: UserProfile = self
            .store
            .get_as(Collection::Users, auth.user_key())
            .await?
            .ok_or_else(|| AppError::ProfileMissing(auth.email.to_string()))?;

        if self.role_for(&auth.email) == Role::Admin && !profile.is_admin() {
            self.store
                .update(
                    Collection::Users,
                    auth.user_key(),
                    serde_json::json!({ "role": Role::Admin }),
                )
                .await?;
            profile.role = Role::Admin;
            tracing::info!(email = %auth.email, "granted admin role");
        }

        Ok(Session { auth, profile })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcros_auth::StoreIdentityProvider;
    use amcros_store::MemoryStore;

    fn accounts() -> (Accounts, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(StoreIdentityProvider::new(store.clone()));
        let admin = Email::parse("owner@amcros.in").unwrap();
        (
            Accounts::new(identity, store.clone()).with_admins(vec![admin]),
            store,
        )
    }

    #[tokio::test]
    async fn test_sign_up_writes_profile() {
        let (accounts, store) = accounts();
        let session = accounts
            .sign_up("buyer@mill.in", "socks123", SignUpDetails::new("Mill Traders", ""))
            .await
            .unwrap();
        assert!(!session.is_admin());
        assert!(session.require_admin().is_err());

        let doc = store.get(Collection::Users, "buyer@mill.in").await.unwrap().unwrap();
        assert_eq!(doc.data["businessName"], "Mill Traders");
        assert_eq!(doc.data["cart"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_sign_in_rehydrates() {
        let (accounts, _) = accounts();
        accounts
            .sign_up("buyer@mill.in", "socks123", SignUpDetails::new("Mill", ""))
            .await
            .unwrap();
        accounts.sign_out().await;

        let session = accounts.sign_in("buyer@mill.in", "socks123").await.unwrap();
        assert_eq!(session.profile.business_name, "Mill");
        assert!(accounts.identity().current().is_some());
    }

    #[tokio::test]
    async fn test_listed_admin_gets_role() {
        let (accounts, _) = accounts();
        let session = accounts
            .sign_up("Owner@Amcros.in", "socks123", SignUpDetails::new("Amcros", ""))
            .await
            .unwrap();
        assert!(session.is_admin());
    }

    #[tokio::test]
    async fn test_invalid_details_create_nothing() {
        let (accounts, store) = accounts();
        assert!(accounts
            .sign_up("a@b.in", "socks123", SignUpDetails::new("", ""))
            .await
            .is_err());
        assert_eq!(store.count(Collection::Credentials).await, 0);
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(StoreIdentityProvider::new(store.clone()));
        identity.sign_up("ghost@x.in", "socks123").await.unwrap();

        let accounts = Accounts::new(identity, store);
        assert!(matches!(
            accounts.sign_in("ghost@x.in", "socks123").await,
            Err(AppError::ProfileMissing(_))
        ));
    }
}
