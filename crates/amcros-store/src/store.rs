//! The document store trait and typed helpers.

use crate::{ChangeEvent, Collection, Document, StoreError, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// A collection-of-documents store.
///
/// Every call is an independent round trip. Writes replace whole documents or
/// whole top-level fields; there are no transactions, so concurrent writers
/// to the same field resolve last-write-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if it does not exist.
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Create or overwrite a whole document.
    async fn set(&self, collection: Collection, id: &str, data: Value) -> StoreResult<()>;

    /// Replace the given top-level fields of an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document is missing.
    async fn update(&self, collection: Collection, id: &str, fields: Value) -> StoreResult<()>;

    /// Add a document under a store-assigned key and return the key.
    async fn create(&self, collection: Collection, data: Value) -> StoreResult<String>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;

    /// Every document in a collection, ordered by key.
    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Documents whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>>;

    /// Live feed of writes to a collection.
    fn subscribe(&self, collection: Collection) -> Subscription;
}

/// Receives change events for one collection.
pub struct Subscription {
    collection: Collection,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn new(collection: Collection, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            collection,
            receiver,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Wait for the next change to this collection.
    ///
    /// Returns `None` once the store is dropped. Events missed because the
    /// subscriber fell behind are skipped; callers re-list to resync.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(collection = %self.collection, skipped, "subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Serde conveniences over any [`DocumentStore`].
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    async fn get_as<T: DeserializeOwned + Send>(
        &self,
        collection: Collection,
        id: &str,
    ) -> StoreResult<Option<T>> {
        match self.get(collection, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    async fn set_as<T: Serialize + Sync>(
        &self,
        collection: Collection,
        id: &str,
        value: &T,
    ) -> StoreResult<()> {
        let data = serde_json::to_value(value)?;
        self.set(collection, id, data).await
    }

    async fn create_as<T: Serialize + Sync>(
        &self,
        collection: Collection,
        value: &T,
    ) -> StoreResult<String> {
        let data = serde_json::to_value(value)?;
        self.create(collection, data).await
    }

    /// Decode every document, pairing each with its key.
    ///
    /// One malformed document does not hide the rest of the collection.
    async fn list_as<T: DeserializeOwned + Send>(
        &self,
        collection: Collection,
    ) -> StoreResult<Vec<(String, T)>> {
        decode_all(self.list(collection).await?)
    }

    async fn query_as<T: DeserializeOwned + Send>(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(String, T)>> {
        decode_all(self.query_eq(collection, field, value).await?)
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}

/// Documents that do not decode are logged and left out of the result.
fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> StoreResult<Vec<(String, T)>> {
    Ok(docs
        .into_iter()
        .filter_map(|doc| match doc.decode() {
            Ok(value) => Some((doc.id, value)),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "skipping undecodable document");
                None
            }
        })
        .collect())
}

/// Merge `fields` into `target`, both of which must be objects.
pub(crate) fn merge_fields(id: &str, target: &mut Value, fields: Value) -> StoreResult<()> {
    let Value::Object(fields) = fields else {
        return Err(StoreError::InvalidDocument {
            id: id.to_string(),
            reason: "update fields must be an object".to_string(),
        });
    };
    let Value::Object(target) = target else {
        return Err(StoreError::InvalidDocument {
            id: id.to_string(),
            reason: "stored body is not an object".to_string(),
        });
    };
    for (key, value) in fields {
        target.insert(key, value);
    }
    Ok(())
}

pub(crate) fn ensure_object(id: &str, data: &Value) -> StoreResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument {
            id: id.to_string(),
            reason: "document body must be a JSON object".to_string(),
        })
    }
}
