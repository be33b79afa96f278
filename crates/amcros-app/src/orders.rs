//! A customer's order history.

use crate::{AppError, AppResult, Session};
use amcros_commerce::checkout::Order;
use amcros_commerce::{Email, OrderId};
use amcros_store::{Collection, DocumentStore, DocumentStoreExt};
use std::sync::Arc;

pub struct OrderHistory {
    store: Arc<dyn DocumentStore>,
}

impl OrderHistory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The session user's orders, newest first.
    pub async fn for_user(&self, session: &Session) -> AppResult<Vec<Order>> {
        self.by_email(session.email()).await
    }

    /// One of the session user's orders, by document key or order number.
    pub async fn get(&self, session: &Session, key: &str) -> AppResult<Order> {
        let found = match self.store.get_as::<Order>(Collection::Orders, key).await? {
            Some(order) => Some(order.with_id(OrderId::new(key))),
            None => self
                .by_email(session.email())
                .await?
                .into_iter()
                .find(|o| o.order_number.eq_ignore_ascii_case(key)),
        };

        // Someone else's order looks the same as a missing one.
        match found {
            Some(order) if &order.email == session.email() || session.is_admin() => Ok(order),
            _ => Err(AppError::OrderNotFound(key.to_string())),
        }
    }

    /// The `limit` most recent orders for an email.
    pub async fn recent(&self, email: &Email, limit: usize) -> AppResult<Vec<Order>> {
        let mut orders = self.by_email(email).await?;
        orders.truncate(limit);
        Ok(orders)
    }

    async fn by_email(&self, email: &Email) -> AppResult<Vec<Order>> {
        let rows: Vec<(String, Order)> = self
            .store
            .query_as(Collection::Orders, "email", &serde_json::json!(email))
            .await?;
        let mut orders: Vec<Order> = rows
            .into_iter()
            .map(|(id, order)| order.with_id(OrderId::new(id)))
            .collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }
}

/// Order date descending; order number breaks ties.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.order_date
            .cmp(&a.order_date)
            .then_with(|| b.order_number.cmp(&a.order_number))
    });
}
