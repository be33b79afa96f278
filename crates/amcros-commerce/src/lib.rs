//! Storefront domain types and logic for Amcros Connect.
//!
//! This crate has no I/O. It provides:
//!
//! - **Catalog**: socks products with pack-size variants, admin edits
//! - **Cart**: positional line items, merge rules, pricing
//! - **Checkout**: the placing state machine, orders, order numbers
//! - **Search**: text and style filters over the catalog
//! - **Profile / Notifications / FAQ**: the remaining storefront documents
//!
//! # Example
//!
//! ```rust
//! use amcros_commerce::prelude::*;
//!
//! let socks = Product::new("ankle-socks", "Ankle Socks")
//!     .with_variant(3, Money::from_rupees(100));
//!
//! let mut cart = Cart::new();
//! cart.add_product(&socks, 3, 2).unwrap();
//!
//! let pricing = cart.pricing(&PricingRules::default());
//! assert_eq!(pricing.total.display(), "\u{20b9}216.00");
//! ```

pub mod email;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod faq;
pub mod notification;
pub mod profile;
pub mod search;

pub use email::{Email, EmailError};
pub use error::CommerceError;
pub use ids::*;
pub use money::{Money, CURRENCY_CODE, CURRENCY_SYMBOL};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::email::Email;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{PackVariant, Product, ProductUpdate};

    // Cart
    pub use crate::cart::{Cart, CartLineItem, CartPricing, PricingRules, QuantityChange};

    // Checkout
    pub use crate::checkout::{
        CheckoutFlow, CheckoutStep, Order, OrderLineItem, OrderNumberGenerator, OrderStatus,
        PaymentMethod, RandomOrderNumbers, SequentialOrderNumbers,
    };

    // Accounts
    pub use crate::notification::{NewNotification, Notification};
    pub use crate::profile::{ProfileUpdate, Role, SignUpDetails, UserProfile};

    // Search
    pub use crate::search::{Filter, SearchQuery, SortOption};
}
