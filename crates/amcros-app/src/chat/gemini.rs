//! Gemini `generateContent` client.

use super::{ChatContext, ChatError, ChatResponder};
use crate::config::ChatbotConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Answers with a hosted language model, grounded on the customer's recent orders.
#[derive(Clone)]
pub struct GenerativeResponder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl std::fmt::Debug for GenerativeResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeResponder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GenerativeResponder {
    /// A missing key is not an error here; every reply fails until one is set.
    pub fn from_config(config: &ChatbotConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<String, ChatError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Parse(format!("failed to parse response: {e}")))?;
        parsed.text().ok_or(ChatError::EmptyResponse)
    }
}

/// The prompt sent to the model. Orders are embedded as pretty JSON.
pub fn build_prompt(message: &str, context: &ChatContext) -> String {
    let order_history = if context.email.is_some() {
        serde_json::to_string_pretty(&context.recent_orders).unwrap_or_default()
    } else {
        String::new()
    };

    format!(
        "You are a helpful assistant for Amcros Hitex Pvt Ltd, a socks manufacturing company.\n\
         Your job is to answer customer queries based on their past orders.\n\
         \n\
         Recent Orders:\n\
         {order_history}\n\
         \n\
         Answer this user question in a helpful and friendly tone:\n\
         \"{message}\"\n"
    )
}

#[async_trait]
impl ChatResponder for GenerativeResponder {
    fn name(&self) -> &'static str {
        "generative"
    }

    #[instrument(skip(self, message, context), fields(model = %self.model))]
    async fn respond(&self, message: &str, context: &ChatContext) -> Result<String, ChatError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ChatError::MissingApiKey(self.api_key_env.clone()))?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(message, context),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, `None` when it is blank.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
