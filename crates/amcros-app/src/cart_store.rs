//! The user's cart, synced to the `cart` field of their user document.

use crate::{AppError, AppResult, Session};
use amcros_commerce::cart::{Cart, CartLineItem, CartPricing, PricingRules, QuantityChange};
use amcros_commerce::catalog::Product;
use amcros_commerce::Email;
use amcros_store::{Collection, DocumentStore, StoreError};
use std::sync::Arc;
use tracing::instrument;

/// Local cart plus its remote copy.
///
/// Every mutation changes the local list first and then overwrites the whole
/// remote list. If that write fails the local list keeps the change, the
/// error is logged and returned, and nothing reconciles the two; the next
/// successful write overwrites the remote copy again.
pub struct CartStore {
    store: Arc<dyn DocumentStore>,
    user: Email,
    cart: Cart,
    rules: PricingRules,
}

impl CartStore {
    /// Fetch the remote cart. A missing document or field is an empty cart,
    /// and so is a failed fetch, which is logged and not retried.
    #[instrument(skip(store, session, rules), fields(user = %session.email()))]
    pub async fn load(store: Arc<dyn DocumentStore>, session: &Session, rules: PricingRules) -> Self {
        let user = session.email().clone();
        let cart = match fetch_cart(store.as_ref(), &user).await {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cart");
                Cart::new()
            }
        };
        tracing::debug!(items = cart.len(), "cart loaded");

        Self {
            store,
            user,
            cart,
            rules,
        }
    }

    pub fn user(&self) -> &Email {
        &self.user
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Totals, recomputed on every call.
    pub fn pricing(&self) -> CartPricing {
        self.cart.pricing(&self.rules)
    }

    /// Add packs of a product; returns the row position now holding them.
    #[instrument(skip(self, product), fields(user = %self.user, product = %product.id))]
    pub async fn add_item(
        &mut self,
        product: &Product,
        pack_size: u32,
        quantity: u32,
    ) -> AppResult<usize> {
        let index = self.cart.add_product(product, pack_size, quantity)?;
        self.save().await?;
        Ok(index)
    }

    /// Change a row's quantity; a result below one removes the row.
    #[instrument(skip(self), fields(user = %self.user))]
    pub async fn update_quantity(&mut self, index: usize, delta: i64) -> AppResult<QuantityChange> {
        let change = self.cart.adjust_quantity(index, delta)?;
        self.save().await?;
        Ok(change)
    }

    #[instrument(skip(self), fields(user = %self.user))]
    pub async fn remove_item(&mut self, index: usize) -> AppResult<CartLineItem> {
        let removed = self.cart.remove_item(index)?;
        self.save().await?;
        Ok(removed)
    }

    #[instrument(skip(self), fields(user = %self.user))]
    pub async fn clear(&mut self) -> AppResult<()> {
        self.cart.clear();
        self.save().await
    }

    /// Overwrite the remote list with the local one.
    async fn save(&self) -> AppResult<()> {
        let fields = serde_json::json!({ "cart": &self.cart });
        match self
            .store
            .update(Collection::Users, self.user.as_str(), fields)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, items = self.cart.len(), "cart write failed; remote cart is stale");
                Err(AppError::CartNotSaved(e))
            }
        }
    }
}

async fn fetch_cart(store: &dyn DocumentStore, user: &Email) -> Result<Cart, StoreError> {
    let Some(doc) = store.get(Collection::Users, user.as_str()).await? else {
        return Ok(Cart::new());
    };
    match doc.field("cart") {
        None | Some(serde_json::Value::Null) => Ok(Cart::new()),
        Some(value) => {
            let items: Vec<CartLineItem> = serde_json::from_value(value.clone())?;
            Ok(Cart::from_items(items))
        }
    }
}
