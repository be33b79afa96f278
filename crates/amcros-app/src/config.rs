//! Application configuration (`amcros.toml`).

use crate::{AppError, AppResult};
use amcros_commerce::checkout::{OrderNumberGenerator, RandomOrderNumbers, SequentialOrderNumbers};
use amcros_commerce::cart::PricingRules;
use amcros_commerce::Email;
use amcros_store::{Collection, DocumentStore, JsonFileStore, MemoryStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,

    /// Tax and shipping rules.
    #[serde(default)]
    pub pricing: PricingRules,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    #[serde(default)]
    pub chatbot: ChatbotConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load config from a file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| AppError::Config(format!("invalid JSON in {}: {}", path.display(), e)))
        } else {
            Self::from_toml_str(&content)
                .map_err(|e| AppError::Config(format!("{} ({})", e, path.display())))
        }
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("invalid TOML: {}", e)))
    }

    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Open the configured document store.
    pub async fn open_store(&self) -> AppResult<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Json => Arc::new(JsonFileStore::open(&self.store.data_dir).await?),
        };
        Ok(store)
    }

    /// The configured order-number strategy.
    ///
    /// The sequential counter resumes after the highest number already in
    /// `orders`, so each run of the app continues the series.
    pub async fn order_numbers(
        &self,
        store: &dyn DocumentStore,
    ) -> AppResult<Arc<dyn OrderNumberGenerator>> {
        Ok(match self.checkout.order_numbers {
            OrderNumberStrategy::Random => Arc::new(RandomOrderNumbers),
            OrderNumberStrategy::Sequential => {
                let orders = store.list(Collection::Orders).await?;
                let issued = orders
                    .iter()
                    .filter_map(|doc| doc.data.get("orderNumber").and_then(|n| n.as_str()));
                let numbers = SequentialOrderNumbers::after(issued);
                tracing::debug!(orders = orders.len(), "sequential order numbers seeded");
                Arc::new(numbers)
            }
        })
    }
}

/// Which document store backend to use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Directory holding one JSON file per collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".amcros")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderNumberStrategy {
    #[default]
    Random,
    Sequential,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub order_numbers: OrderNumberStrategy,

    /// Give up on the order create call after this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl CheckoutConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatStrategy {
    #[default]
    Rules,
    Generative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatbotConfig {
    #[serde(default)]
    pub strategy: ChatStrategy,

    /// Generative model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Inline API key; the environment variable wins when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            strategy: ChatStrategy::default(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ChatbotConfig {
    /// Resolve the API key from the environment, then the file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

/// Accounts granted the admin role when they sign up or sign in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    #[serde(default)]
    pub emails: Vec<Email>,
}

/// Annotated starter config written by `amcros init`-style helpers.
pub fn generate_default_config() -> String {
    r#"# Amcros Connect configuration

[store]
# "json" keeps one file per collection in data_dir; "memory" forgets on exit.
backend = "json"
data_dir = ".amcros"

[pricing]
tax_rate_bps = 800
free_shipping_above = 50.0
flat_shipping = 5.99

[checkout]
order_numbers = "random"
# timeout_secs = 10

[chatbot]
strategy = "rules"
model = "gemini-1.5-pro"
api_key_env = "GEMINI_API_KEY"

[admin]
emails = []
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcros_commerce::Money;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.backend, StoreBackend::Json);
        assert_eq!(config.pricing.tax_rate_bps, 800);
        assert_eq!(config.checkout.timeout(), None);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = AppConfig::from_toml_str(&generate_default_config()).unwrap();
        assert_eq!(config.pricing, PricingRules::default());
        assert_eq!(config.chatbot.strategy, ChatStrategy::Rules);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [pricing]
            flat_shipping = 40

            [checkout]
            order_numbers = "sequential"
            timeout_secs = 5

            [admin]
            emails = ["Owner@Amcros.in"]
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing.flat_shipping, Money::from_rupees(40));
        assert_eq!(config.pricing.tax_rate_bps, 800);
        assert_eq!(config.checkout.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.admin.emails[0].as_str(), "owner@amcros.in");
        assert_eq!(config.checkout.order_numbers, OrderNumberStrategy::Sequential);
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        assert!(matches!(
            AppConfig::from_toml_str("[store]\nbackend = \"redis\""),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amcros.json");
        std::fs::write(&path, r#"{"store": {"backend": "memory"}}"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_inline_api_key_used_without_env() {
        let config = ChatbotConfig {
            api_key_env: "AMCROS_TEST_UNSET_KEY_VAR".to_string(),
            api_key: Some("inline".to_string()),
            ..ChatbotConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("inline"));
    }

    #[tokio::test]
    async fn test_sequential_numbers_continue_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.store.data_dir = dir.path().to_path_buf();
        config.checkout.order_numbers = OrderNumberStrategy::Sequential;

        let first_run = config.open_store().await.unwrap();
        let numbers = config.order_numbers(first_run.as_ref()).await.unwrap();
        let first = numbers.next_number();
        assert_eq!(first, "AMC000001");
        first_run
            .create(Collection::Orders, serde_json::json!({ "orderNumber": first }))
            .await
            .unwrap();
        drop(first_run);

        let second_run = config.open_store().await.unwrap();
        let numbers = config.order_numbers(second_run.as_ref()).await.unwrap();
        assert_eq!(numbers.next_number(), "AMC000002");
    }
}
