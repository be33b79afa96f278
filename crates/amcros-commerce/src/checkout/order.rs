//! Order types.

use crate::cart::{lenient_quantity, Cart, CartLineItem, CartPricing};
use crate::catalog::pack_label;
use crate::email::Email;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Days between placing an order and its estimated delivery.
pub const DELIVERY_ESTIMATE_DAYS: i64 = 7;

/// Order status.
///
/// Admins move an order one step at a time around a closed loop; there is no
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Dispatched,
    Cancelled,
}

impl OrderStatus {
    /// The admin cycle, in order.
    pub const CYCLE: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Dispatched,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Label stored on the order document.
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Dispatched => "Dispatched",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// The status one admin action moves to.
    pub fn next(&self) -> OrderStatus {
        match self {
            OrderStatus::Pending => OrderStatus::Processing,
            OrderStatus::Processing => OrderStatus::Dispatched,
            OrderStatus::Dispatched => OrderStatus::Cancelled,
            OrderStatus::Cancelled => OrderStatus::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::CYCLE
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CommerceError::InvalidStatus(trimmed.to_string()))
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

/// Labels outside the cycle ("Completed" on hand-edited documents) read as
/// `Pending` so old documents still load.
impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(label.parse().unwrap_or_default())
    }
}

/// How the customer pays. The storefront supports a single method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

/// A line item copied by value into an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "StoredLineItem")]
pub struct OrderLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub image: String,
    /// Variant label at time of order, e.g. "5 Pack".
    pub variant: String,
    pub pack_size: u32,
    /// Unit price at time of order.
    pub price: Money,
    pub quantity: u32,
}

/// An order line as found in the store.
///
/// Orders written by the mobile storefront hold raw cart rows: a pack size
/// and a timestamp but no variant label, and quantities of any shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    #[serde(default)]
    product_id: Option<ProductId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    pack_size: u32,
    #[serde(default)]
    price: Money,
    #[serde(default = "one", deserialize_with = "lenient_quantity")]
    quantity: u32,
}

fn one() -> u32 {
    1
}

impl From<StoredLineItem> for OrderLineItem {
    fn from(stored: StoredLineItem) -> Self {
        let variant = match stored.variant {
            Some(label) if !label.trim().is_empty() => label,
            _ if stored.pack_size > 0 => pack_label(stored.pack_size),
            _ => String::new(),
        };
        Self {
            product_id: stored.product_id,
            name: stored.name,
            image: stored.image,
            variant,
            pack_size: stored.pack_size,
            price: stored.price,
            quantity: stored.quantity,
        }
    }
}

impl OrderLineItem {
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

impl From<&CartLineItem> for OrderLineItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            variant: item.variant_label(),
            pack_size: item.pack_size,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// A placed order. Everything except `status` is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document key; assigned by the store, so it is not part of the body.
    #[serde(skip)]
    pub id: Option<OrderId>,
    pub order_number: String,
    pub email: Email,
    pub items: Vec<OrderLineItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

impl Order {
    /// Snapshot a priced cart into a new order.
    pub fn from_cart(
        order_number: impl Into<String>,
        email: Email,
        cart: &Cart,
        pricing: &CartPricing,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        Ok(Self {
            id: None,
            order_number: order_number.into(),
            email,
            items: cart.items().iter().map(OrderLineItem::from).collect(),
            subtotal: pricing.subtotal,
            tax: pricing.tax,
            shipping: pricing.shipping,
            total: pricing.total,
            payment_method: PaymentMethod::CashOnDelivery,
            status: OrderStatus::Processing,
            order_date: placed_at,
            estimated_delivery: placed_at + Duration::days(DELIVERY_ESTIMATE_DAYS),
        })
    }

    /// Attach the store-assigned document key.
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    /// Total packs in the order.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Move the order one step around the admin cycle.
    pub fn advance_status(&mut self) -> OrderStatus {
        self.status = self.status.next();
        self.status
    }
}
