//! Application service errors.

use crate::chat::ChatError;
use amcros_auth::AuthError;
use amcros_commerce::CommerceError;
use amcros_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The cart changed locally but the remote copy is stale.
    #[error("cart updated locally but could not be saved: {0}")]
    CartNotSaved(#[source] StoreError),

    /// The order write failed; checkout is back in review.
    #[error("order could not be placed: {0}")]
    OrderNotPlaced(#[source] StoreError),

    /// The order write did not finish in time and may still land; checkout
    /// is back in review, and placing again on the same checkout does not
    /// duplicate it.
    #[error("order placement timed out after {0:?}; it may still have been placed")]
    CheckoutTimedOut(std::time::Duration),

    /// Signed in, but there is no user document for the account.
    #[error("no profile found for {0}")]
    ProfileMissing(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// The session lacks the admin role.
    #[error("admin access required")]
    Forbidden,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("chat error: {0}")]
    Chat(#[from] ChatError),
}

impl AppError {
    /// Errors that leave local state changed while the remote copy failed.
    pub fn is_sync_failure(&self) -> bool {
        matches!(self, AppError::CartNotSaved(_))
    }

    /// Errors after which `CheckoutWorkflow::place` can be called again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::OrderNotPlaced(_) | AppError::CheckoutTimedOut(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
