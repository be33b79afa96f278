//! Collections, documents and change events.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The collections the storefront uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// User profiles keyed by email, each embedding its cart.
    Users,
    Products,
    Orders,
    Notifications,
    /// Password hashes, kept apart from the readable user documents.
    Credentials,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Products,
        Collection::Orders,
        Collection::Notifications,
        Collection::Credentials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Orders => "orders",
            Collection::Notifications => "notifications",
            Collection::Credentials => "credentials",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document: its key and its JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode the body.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    /// Top-level field lookup.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Published to subscribers after every successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub id: String,
    pub kind: ChangeKind,
    /// Body after the write; `None` for deletes.
    pub data: Option<Value>,
}

impl ChangeEvent {
    pub fn document(&self) -> Option<Document> {
        self.data
            .as_ref()
            .map(|data| Document::new(self.id.clone(), data.clone()))
    }
}
