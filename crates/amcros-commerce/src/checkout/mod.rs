//! Checkout module.
//!
//! Contains the checkout state machine, orders and order numbering.

mod flow;
mod number;
mod order;

pub use flow::{CheckoutFlow, CheckoutStep};
pub use number::{
    order_number_value, OrderNumberGenerator, RandomOrderNumbers, SequentialOrderNumbers,
    ORDER_NUMBER_PREFIX,
};
pub use order::{
    Order, OrderLineItem, OrderStatus, PaymentMethod, DELIVERY_ESTIMATE_DAYS,
};
