//! Checkout: turn the priced cart into an order document.

use crate::{AppError, AppResult, CartStore, Session};
use amcros_commerce::cart::{CartLineItem, CartPricing};
use amcros_commerce::checkout::{
    CheckoutFlow, CheckoutStep, Order, OrderLineItem, OrderNumberGenerator,
};
use amcros_commerce::{CommerceError, OrderId};
use amcros_store::{Collection, DocumentStore, DocumentStoreExt, StoreError};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// What the review screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub items: Vec<CartLineItem>,
    pub pricing: CartPricing,
    pub payment_method: &'static str,
}

/// One checkout attempt.
///
/// The order is written under a document key chosen before the first try.
/// When a try fails or times out, the next `place` reuses that key and order
/// number as long as the cart is unchanged, and checks whether the earlier
/// write landed. A retry therefore never stores a second copy of an order
/// whose first write went through after the caller stopped waiting.
pub struct CheckoutWorkflow {
    store: Arc<dyn DocumentStore>,
    numbers: Arc<dyn OrderNumberGenerator>,
    flow: CheckoutFlow,
    timeout: Option<Duration>,
    unconfirmed: Option<(OrderId, Order)>,
}

impl CheckoutWorkflow {
    pub fn new(store: Arc<dyn DocumentStore>, numbers: Arc<dyn OrderNumberGenerator>) -> Self {
        Self {
            store,
            numbers,
            flow: CheckoutFlow::new(),
            timeout: None,
            unconfirmed: None,
        }
    }

    /// Stop waiting for the order write after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn step(&self) -> CheckoutStep {
        self.flow.step()
    }

    pub fn flow(&self) -> &CheckoutFlow {
        &self.flow
    }

    /// Current totals. Only available while reviewing.
    pub fn review(&self, cart: &CartStore) -> AppResult<CheckoutSummary> {
        self.flow.edit_cart()?;
        Ok(CheckoutSummary {
            items: cart.items().to_vec(),
            pricing: cart.pricing(),
            payment_method: amcros_commerce::checkout::PaymentMethod::CashOnDelivery.display_name(),
        })
    }

    /// Confirm and place the order.
    ///
    /// On success the flow is `Placed` and the cart is cleared. A failure to
    /// clear the cart is logged and does not undo the order.
    #[instrument(skip(self, session, cart), fields(user = %session.email()))]
    pub async fn place(&mut self, session: &Session, cart: &mut CartStore) -> AppResult<Order> {
        if cart.user() != session.email() {
            return Err(AppError::Forbidden);
        }
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }

        self.flow.edit_cart()?;
        let (id, order, retry) = self.prepare(session, cart)?;

        self.flow.begin_placing()?;
        if let Err(e) = self.write(&id, &order, retry).await {
            self.flow.mark_failed()?;
            tracing::warn!(
                error = %e,
                order_number = %order.order_number,
                attempts = self.flow.failed_attempts(),
                "order write failed; back to review"
            );
            self.unconfirmed = Some((id, order));
            return Err(e);
        }

        self.flow.mark_placed(order.order_number.clone())?;
        tracing::info!(
            order_number = %order.order_number,
            total = %order.total,
            items = order.items.len(),
            "order placed"
        );

        if let Err(e) = cart.clear().await {
            tracing::warn!(error = %e, "order placed but cart was not cleared");
        }

        Ok(order.with_id(id))
    }

    /// The order to write, and whether an earlier try may already have
    /// stored it.
    fn prepare(&mut self, session: &Session, cart: &CartStore) -> AppResult<(OrderId, Order, bool)> {
        let pricing = cart.pricing();
        if let Some((id, order)) = self.unconfirmed.take() {
            let same_cart = order.email == *session.email()
                && order.total == pricing.total
                && order.items.len() == cart.items().len()
                && order
                    .items
                    .iter()
                    .zip(cart.items())
                    .all(|(placed, row)| *placed == OrderLineItem::from(row));
            if same_cart {
                return Ok((id, order, true));
            }
            tracing::debug!(
                order_number = %order.order_number,
                "cart changed since the last try; numbering a new order"
            );
        }

        let order = Order::from_cart(
            self.numbers.next_number(),
            session.email().clone(),
            cart.cart(),
            &pricing,
            Utc::now(),
        )?;
        Ok((OrderId::generate(), order, false))
    }

    async fn write(&self, id: &OrderId, order: &Order, retry: bool) -> AppResult<()> {
        let attempt = async {
            if retry && self.store.get(Collection::Orders, id.as_str()).await?.is_some() {
                tracing::info!(
                    order_number = %order.order_number,
                    "earlier try had already stored the order"
                );
                return Ok::<_, StoreError>(());
            }
            self.store.set_as(Collection::Orders, id.as_str(), order).await
        };
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => return Err(AppError::CheckoutTimedOut(limit)),
            },
            None => attempt.await,
        };
        result.map_err(AppError::OrderNotPlaced)
    }
}
