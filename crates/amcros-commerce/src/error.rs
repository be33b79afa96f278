//! Commerce error types.

use crate::email::EmailError;
use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product has no variant with the requested pack size.
    #[error("Product {product} has no {pack_size}-pack variant")]
    VariantNotFound { product: String, pack_size: u32 },

    /// Positional cart index does not exist.
    #[error("Cart has no line item at position {index} (cart holds {len})")]
    LineItemOutOfRange { index: usize, len: usize },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u32, u32),

    /// Checkout was asked to do something its current state forbids.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Unknown order status label.
    #[error("Unknown order status: {0}")]
    InvalidStatus(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Malformed email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}
