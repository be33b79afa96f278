//! Customer support chat.
//!
//! A [`ChatResponder`] turns a question plus the customer's recent orders
//! into a reply. Two strategies ship: [`RuleBasedResponder`] answers from
//! keyword intents offline, and [`GenerativeResponder`] calls a hosted
//! language model. [`SupportChat`] wraps either one and never fails: any
//! error becomes [`FALLBACK_REPLY`].

mod gemini;
mod rules;

pub use gemini::GenerativeResponder;
pub use rules::RuleBasedResponder;

use crate::config::{ChatStrategy, ChatbotConfig};
use crate::orders::OrderHistory;
use crate::AppResult;
use amcros_commerce::checkout::Order;
use amcros_commerce::Email;
use amcros_store::DocumentStore;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// What the customer sees when a reply cannot be produced.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble answering that right now.";

/// How many past orders a responder sees.
pub const RECENT_ORDER_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by the model API")]
    RateLimited,

    #[error("parse error: {0}")]
    Parse(String),

    /// The model returned no text.
    #[error("empty response from model")]
    EmptyResponse,

    #[error("no API key configured (set {0})")]
    MissingApiKey(String),
}

/// Everything a responder may use besides the message itself.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// `None` for signed-out visitors.
    pub email: Option<Email>,
    /// Newest first, at most [`RECENT_ORDER_LIMIT`].
    pub recent_orders: Vec<Order>,
}

#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn respond(&self, message: &str, context: &ChatContext) -> Result<String, ChatError>;
}

pub struct SupportChat {
    responder: Arc<dyn ChatResponder>,
    orders: OrderHistory,
}

impl SupportChat {
    pub fn new(store: Arc<dyn DocumentStore>, responder: Arc<dyn ChatResponder>) -> Self {
        Self {
            responder,
            orders: OrderHistory::new(store),
        }
    }

    /// Pick the responder named in config.
    pub fn from_config(store: Arc<dyn DocumentStore>, config: &ChatbotConfig) -> AppResult<Self> {
        let responder: Arc<dyn ChatResponder> = match config.strategy {
            ChatStrategy::Rules => Arc::new(RuleBasedResponder::new()),
            ChatStrategy::Generative => Arc::new(GenerativeResponder::from_config(config)?),
        };
        Ok(Self::new(store, responder))
    }

    pub fn responder_name(&self) -> &'static str {
        self.responder.name()
    }

    /// Answer a customer question. Never fails.
    #[instrument(skip(self, message), fields(responder = self.responder.name()))]
    pub async fn reply(&self, message: &str, email: Option<&Email>) -> String {
        match self.try_reply(message, email).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat reply failed; sending apology");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn try_reply(&self, message: &str, email: Option<&Email>) -> AppResult<String> {
        let recent_orders = match email {
            Some(email) => self.orders.recent(email, RECENT_ORDER_LIMIT).await?,
            None => Vec::new(),
        };
        let context = ChatContext {
            email: email.cloned(),
            recent_orders,
        };
        Ok(self.responder.respond(message, &context).await?)
    }
}
