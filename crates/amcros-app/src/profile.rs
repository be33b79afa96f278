//! Editing the signed-in user's business details.

use crate::{AppResult, Session};
use amcros_commerce::profile::ProfileUpdate;
use amcros_store::{Collection, DocumentStore};
use std::sync::Arc;
use tracing::instrument;

pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write the edited fields and apply them to the session's profile.
    ///
    /// Only the four editable fields are sent, so the stored cart and role
    /// survive the edit.
    #[instrument(skip(self, session, update), fields(user = %session.email()))]
    pub async fn update(&self, session: &mut Session, update: ProfileUpdate) -> AppResult<()> {
        let update = update.normalized();
        update.validate()?;

        let fields = serde_json::to_value(&update).map_err(amcros_store::StoreError::from)?;
        self.store
            .update(Collection::Users, session.user_key(), fields)
            .await?;

        session.profile.apply_update(update);
        tracing::info!("profile updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcros_auth::AuthSession;
    use amcros_commerce::cart::CartLineItem;
    use amcros_commerce::profile::{SignUpDetails, UserProfile};
    use amcros_commerce::{Email, Money};
    use amcros_store::{DocumentStoreExt, MemoryStore};

    #[tokio::test]
    async fn test_update_keeps_cart_and_trims() {
        let store = Arc::new(MemoryStore::new());
        let email = Email::parse("buyer@mill.in").unwrap();
        let mut profile = UserProfile::from_sign_up(email.clone(), "uid", SignUpDetails::new("Mill", ""));
        profile
            .cart
            .add_item(CartLineItem::new("Ankle Socks", 3, Money::from_rupees(250)))
            .unwrap();
        store.set_as(Collection::Users, email.as_str(), &profile).await.unwrap();

        let mut session = Session {
            auth: AuthSession::new("uid", email),
            profile,
        };
        let mut update = ProfileUpdate::from_profile(&session.profile);
        update.contact = " 98400 12345 ".to_string();
        update.gstin = "33aaacm1234f1z5".to_string();

        ProfileService::new(store.clone())
            .update(&mut session, update)
            .await
            .unwrap();
        assert_eq!(session.profile.contact, "98400 12345");

        let stored: UserProfile = store
            .get_as(Collection::Users, "buyer@mill.in")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.gstin, "33AAACM1234F1Z5");
        assert_eq!(stored.cart.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_update_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let email = Email::parse("buyer@mill.in").unwrap();
        let profile = UserProfile::from_sign_up(email.clone(), "uid", SignUpDetails::new("Mill", ""));
        store.set_as(Collection::Users, email.as_str(), &profile).await.unwrap();
        let mut session = Session {
            auth: AuthSession::new("uid", email),
            profile,
        };

        let mut update = ProfileUpdate::from_profile(&session.profile);
        update.gstin = "short".to_string();
        assert!(ProfileService::new(store).update(&mut session, update).await.is_err());
        assert_eq!(session.profile.gstin, "");
    }
}
