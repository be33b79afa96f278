//! Shopping cart module.
//!
//! Contains the cart line items a user intends to buy and the pricing rules
//! that turn them into totals.

mod cart;
mod pricing;

pub use cart::{Cart, CartLineItem, QuantityChange, MAX_QUANTITY_PER_ITEM};
pub(crate) use cart::lenient_quantity;
pub use pricing::{CartPricing, PricingRules};
