//! Keyword intents answered from the customer's recent orders.

use super::{ChatContext, ChatError, ChatResponder};
use amcros_commerce::checkout::{Order, OrderStatus, DELIVERY_ESTIMATE_DAYS};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Greeting,
    OrderStatus,
    Delivery,
    Payment,
    Cancellation,
    Returns,
    Unknown,
}

/// Checked in order; the first intent with a matching keyword wins.
const KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Cancellation, &["cancel"]),
    (Intent::Returns, &["return", "refund", "exchange", "damaged", "defective"]),
    (Intent::Payment, &["pay", "cash", "cod", "upi", "card", "invoice"]),
    (Intent::Delivery, &["deliver", "arrive", "ship", "when will", "eta"]),
    (Intent::OrderStatus, &["status", "order", "track", "where is", "amc"]),
    (Intent::Greeting, &["hello", "hi", "hey", "good morning", "good evening", "namaste"]),
];

fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (intent, keywords) in KEYWORDS {
        let hit = keywords.iter().any(|k| {
            if k.contains(' ') {
                lower.contains(k)
            } else {
                words.iter().any(|w| w.starts_with(k))
            }
        });
        if hit {
            return *intent;
        }
    }
    Intent::Unknown
}

/// Offline responder used when no model is configured.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedResponder;

impl RuleBasedResponder {
    pub fn new() -> Self {
        Self
    }

    fn answer(&self, intent: Intent, context: &ChatContext) -> String {
        let latest = context.recent_orders.first();
        match intent {
            Intent::Greeting => {
                "Hello! I can help with your orders, delivery, payment and returns. What do you need?"
                    .to_string()
            }
            Intent::OrderStatus => match context.email {
                None => "Please sign in so I can look up your orders.".to_string(),
                Some(_) if context.recent_orders.is_empty() => {
                    "I couldn't find any orders on your account yet.".to_string()
                }
                Some(_) => {
                    let lines: Vec<String> = context.recent_orders.iter().map(summary).collect();
                    format!("Here are your recent orders:\n{}", lines.join("\n"))
                }
            },
            Intent::Delivery => match latest {
                Some(order) if order.status == OrderStatus::Dispatched => format!(
                    "Order {} has been dispatched and should arrive by {}.",
                    order.order_number,
                    order.estimated_delivery.format("%d %b %Y")
                ),
                Some(order) if order.status == OrderStatus::Cancelled => format!(
                    "Order {} was cancelled, so it will not be delivered.",
                    order.order_number
                ),
                Some(order) => format!(
                    "Order {} is {} and is estimated to arrive by {}.",
                    order.order_number,
                    order.status.display_name().to_lowercase(),
                    order.estimated_delivery.format("%d %b %Y")
                ),
                None => format!(
                    "Orders usually arrive within {} days of being placed.",
                    DELIVERY_ESTIMATE_DAYS
                ),
            },
            Intent::Payment => {
                let mut reply =
                    "We accept Cash on Delivery. Please keep the exact amount ready.".to_string();
                if let Some(order) = latest {
                    reply.push_str(&format!(
                        " Your latest order {} totals {}.",
                        order.order_number, order.total
                    ));
                }
                reply
            }
            Intent::Cancellation => match latest {
                Some(order) if order.status == OrderStatus::Dispatched => format!(
                    "Order {} has already been dispatched. You can refuse it at delivery or contact support to arrange a return.",
                    order.order_number
                ),
                Some(order) if order.status == OrderStatus::Cancelled => {
                    format!("Order {} is already cancelled.", order.order_number)
                }
                Some(order) => format!(
                    "Order {} has not shipped yet. Contact support with the order number and we will cancel it.",
                    order.order_number
                ),
                None => "You don't have any orders to cancel.".to_string(),
            },
            Intent::Returns => {
                "Returns are accepted within 7 days of delivery for unused packs in original packaging. Contact support with your order number to start one."
                    .to_string()
            }
            Intent::Unknown => {
                "I'm not sure about that one. Try asking about your order status, delivery, payment or returns, or browse the FAQ."
                    .to_string()
            }
        }
    }
}

fn summary(order: &Order) -> String {
    format!(
        "- {} placed {}: {} item(s), {}, {}",
        order.order_number,
        order.order_date.format("%d %b %Y"),
        order.item_count(),
        order.total,
        order.status
    )
}

#[async_trait]
impl ChatResponder for RuleBasedResponder {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn respond(&self, message: &str, context: &ChatContext) -> Result<String, ChatError> {
        let intent = classify(message);
        tracing::debug!(?intent, "classified chat message");
        Ok(self.answer(intent, context))
    }
}
