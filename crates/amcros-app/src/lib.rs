//! Amcros Connect storefront services.
//!
//! Wires the commerce domain to a [`DocumentStore`] and an
//! [`IdentityProvider`]. Every user-scoped service takes an explicit
//! [`Session`]; nothing reads the signed-in user from global state.
//!
//! ```no_run
//! use amcros_app::prelude::*;
//!
//! # async fn demo() -> AppResult<()> {
//! let app = App::from_config(AppConfig::default()).await?;
//! let session = app
//!     .accounts()
//!     .sign_in("buyer@mill.in", "socks123")
//!     .await?;
//!
//! let product = app.catalog().get("sports-socks").await?;
//! let mut cart = app.cart(&session).await;
//! cart.add_item(&product, 5, 2).await?;
//!
//! let mut checkout = app.checkout();
//! let order = checkout.place(&session, &mut cart).await?;
//! println!("placed {} for {}", order.order_number, order.total);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod cart_store;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notifications;
pub mod orders;
pub mod profile;
pub mod session;

pub use admin::AdminService;
pub use cart_store::CartStore;
pub use catalog::CatalogService;
pub use chat::{ChatContext, ChatError, ChatResponder, SupportChat, FALLBACK_REPLY};
pub use checkout::{CheckoutSummary, CheckoutWorkflow};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use notifications::{NotificationFeed, NotificationStream};
pub use orders::OrderHistory;
pub use profile::ProfileService;
pub use session::{Accounts, Session};

use amcros_auth::{IdentityProvider, StoreIdentityProvider};
use amcros_commerce::checkout::OrderNumberGenerator;
use amcros_store::DocumentStore;
use std::sync::Arc;

/// The configured store, identity provider and services.
pub struct App {
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    numbers: Arc<dyn OrderNumberGenerator>,
    accounts: Accounts,
    chat: SupportChat,
}

impl App {
    /// Open the configured store and build every service over it.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let store = config.open_store().await?;
        Self::with_store(config, store).await
    }

    /// Build over an already-open store.
    pub async fn with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(StoreIdentityProvider::new(store.clone()));
        let accounts =
            Accounts::new(identity, store.clone()).with_admins(config.admin.emails.clone());
        let chat = SupportChat::from_config(store.clone(), &config.chatbot)?;
        let numbers = config.order_numbers(store.as_ref()).await?;

        tracing::debug!(
            backend = ?config.store.backend,
            chat = chat.responder_name(),
            "app ready"
        );

        Ok(Self {
            config,
            store,
            numbers,
            accounts,
            chat,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn chat(&self) -> &SupportChat {
        &self.chat
    }

    /// Load the session user's cart.
    pub async fn cart(&self, session: &Session) -> CartStore {
        CartStore::load(self.store.clone(), session, self.config.pricing).await
    }

    /// A fresh checkout in the review step.
    pub fn checkout(&self) -> CheckoutWorkflow {
        CheckoutWorkflow::new(self.store.clone(), self.numbers.clone())
            .with_timeout(self.config.checkout.timeout())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.store.clone())
    }

    pub fn orders(&self) -> OrderHistory {
        OrderHistory::new(self.store.clone())
    }

    pub fn notifications(&self) -> NotificationFeed {
        NotificationFeed::new(self.store.clone())
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone())
    }

    /// Admin console; fails with [`AppError::Forbidden`] for customers.
    pub fn admin(&self, session: &Session) -> AppResult<AdminService> {
        AdminService::new(self.store.clone(), session)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Accounts, AdminService, App, AppConfig, AppError, AppResult, CartStore, CatalogService,
        CheckoutWorkflow, NotificationFeed, OrderHistory, ProfileService, Session, SupportChat,
    };
    pub use amcros_commerce::prelude::*;
}
