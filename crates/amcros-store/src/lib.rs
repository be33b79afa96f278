//! Document store layer for Amcros Connect.
//!
//! The storefront keeps everything in a handful of JSON document collections
//! (`users`, `products`, `orders`, `notifications`). This crate defines the
//! [`DocumentStore`] seam and two backends:
//!
//! - [`MemoryStore`]: process-local, for tests and demos
//! - [`JsonFileStore`]: one JSON file per collection in a data directory
//!
//! # Example
//!
//! ```rust
//! use amcros_store::prelude::*;
//! use serde_json::json;
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let store = MemoryStore::new();
//!     store
//!         .set(Collection::Users, "buyer@mill.in", json!({"email": "buyer@mill.in"}))
//!         .await
//!         .unwrap();
//!
//!     let doc = store.get(Collection::Users, "buyer@mill.in").await.unwrap();
//!     assert!(doc.is_some());
//! });
//! ```

mod document;
mod error;
mod file;
mod memory;
mod store;

pub use document::{ChangeEvent, ChangeKind, Collection, Document};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{DocumentStore, DocumentStoreExt, Subscription};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Collection, Document, DocumentStore, DocumentStoreExt, JsonFileStore, MemoryStore,
        StoreError, StoreResult,
    };
}
