//! Admin console operations: every order, status changes, catalog edits and broadcasts.

use crate::catalog::{decode_product, CatalogService};
use crate::orders::sort_newest_first;
use crate::{AppError, AppResult, Session};
use amcros_commerce::catalog::{launch_catalog, Product, ProductUpdate};
use amcros_commerce::checkout::{Order, OrderStatus};
use amcros_commerce::notification::{NewNotification, Notification};
use amcros_commerce::{CommerceError, NotificationId, OrderId};
use amcros_store::{Collection, DocumentStore, DocumentStoreExt, Subscription};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;

/// Only constructible from an admin session.
pub struct AdminService {
    store: Arc<dyn DocumentStore>,
    admin: String,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").field("admin", &self.admin).finish()
    }
}

impl AdminService {
    pub fn new(store: Arc<dyn DocumentStore>, session: &Session) -> AppResult<Self> {
        session.require_admin()?;
        Ok(Self {
            store,
            admin: session.email().to_string(),
        })
    }

    /// Orders from every customer, newest first.
    pub async fn all_orders(&self) -> AppResult<Vec<Order>> {
        let rows: Vec<(String, Order)> = self.store.list_as(Collection::Orders).await?;
        let mut orders: Vec<Order> = rows
            .into_iter()
            .map(|(id, order)| order.with_id(OrderId::new(id)))
            .collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Move an order one step along Pending, Processing, Dispatched, Cancelled.
    ///
    /// An order whose status is missing or outside the cycle moves to Pending.
    #[instrument(skip(self), fields(admin = %self.admin))]
    pub async fn advance_status(&self, order_id: &str) -> AppResult<OrderStatus> {
        let doc = self
            .store
            .get(Collection::Orders, order_id)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(order_id.to_string()))?;

        let raw = doc.field("status").cloned().unwrap_or(Value::Null);
        let next = match raw.as_str().map(str::parse::<OrderStatus>) {
            Some(Ok(current)) => current.next(),
            _ => OrderStatus::Pending,
        };

        self.store
            .update(Collection::Orders, order_id, json!({ "status": next }))
            .await?;
        tracing::info!(order_id, from = %raw, to = next.display_name(), "order status changed");
        Ok(next)
    }

    /// Replace a product's name, image and variants.
    #[instrument(skip(self, update), fields(admin = %self.admin))]
    pub async fn update_product(&self, product_id: &str, update: ProductUpdate) -> AppResult<Product> {
        let doc = self
            .store
            .get(Collection::Products, product_id)
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
        let mut product = decode_product(doc)?;
        product.apply_update(update)?;

        self.store
            .update(
                Collection::Products,
                product_id,
                json!({
                    "name": product.name,
                    "image": product.image,
                    "variants": product.variants,
                }),
            )
            .await?;
        tracing::info!(product_id, variants = product.variants.len(), "product updated");
        Ok(product)
    }

    /// Broadcast a notification to every user.
    #[instrument(skip(self, draft), fields(admin = %self.admin))]
    pub async fn send_notification(&self, draft: NewNotification) -> AppResult<Notification> {
        let notification = draft.into_notification(Utc::now())?;
        let id = self
            .store
            .create_as(Collection::Notifications, &notification)
            .await?;
        tracing::info!(id = %id, title = %notification.title, "notification sent");
        Ok(notification.with_id(NotificationId::new(id)))
    }

    /// Live feed of order writes, for the console's order table.
    pub fn watch_orders(&self) -> Subscription {
        self.store.subscribe(Collection::Orders)
    }

    /// Load the launch catalog into an empty store.
    pub async fn seed_catalog(&self) -> AppResult<usize> {
        CatalogService::new(self.store.clone())
            .seed(&launch_catalog())
            .await
    }
}
