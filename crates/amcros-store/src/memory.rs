//! In-memory document store.

use crate::store::{ensure_object, merge_fields, Subscription};
use crate::{ChangeEvent, ChangeKind, Collection, Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{broadcast, RwLock};

/// Capacity of the change-event channel shared by all subscribers.
pub(crate) const EVENT_CAPACITY: usize = 256;

/// One collection's documents, ordered by key.
#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    docs: BTreeMap<String, Value>,
}

impl Table {
    pub(crate) fn from_docs(docs: BTreeMap<String, Value>) -> Self {
        Self { docs }
    }

    pub(crate) fn docs(&self) -> &BTreeMap<String, Value> {
        &self.docs
    }

    fn get(&self, id: &str) -> Option<Document> {
        self.docs.get(id).map(|data| Document::new(id, data.clone()))
    }

    pub(crate) fn set(
        &mut self,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> StoreResult<ChangeEvent> {
        ensure_object(id, &data)?;
        let kind = if self.docs.contains_key(id) {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        self.docs.insert(id.to_string(), data.clone());
        Ok(ChangeEvent {
            collection,
            id: id.to_string(),
            kind,
            data: Some(data),
        })
    }

    pub(crate) fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: Value,
    ) -> StoreResult<ChangeEvent> {
        let doc = self
            .docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_fields(id, doc, fields)?;
        Ok(ChangeEvent {
            collection,
            id: id.to_string(),
            kind: ChangeKind::Updated,
            data: Some(doc.clone()),
        })
    }

    pub(crate) fn delete(&mut self, collection: Collection, id: &str) -> Option<ChangeEvent> {
        self.docs.remove(id).map(|_| ChangeEvent {
            collection,
            id: id.to_string(),
            kind: ChangeKind::Deleted,
            data: None,
        })
    }

    fn list(&self) -> Vec<Document> {
        self.docs
            .iter()
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect()
    }

    fn query_eq(&self, field: &str, value: &Value) -> Vec<Document> {
        self.docs
            .iter()
            .filter(|(_, data)| data.get(field) == Some(value))
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect()
    }
}

/// Fresh store-assigned document key.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Read-side operations shared by the memory and file backends.
pub(crate) async fn read_get(
    tables: &RwLock<HashMap<Collection, Table>>,
    collection: Collection,
    id: &str,
) -> Option<Document> {
    tables.read().await.get(&collection).and_then(|t| t.get(id))
}

pub(crate) async fn read_list(
    tables: &RwLock<HashMap<Collection, Table>>,
    collection: Collection,
) -> Vec<Document> {
    tables
        .read()
        .await
        .get(&collection)
        .map(Table::list)
        .unwrap_or_default()
}

pub(crate) async fn read_query(
    tables: &RwLock<HashMap<Collection, Table>>,
    collection: Collection,
    field: &str,
    value: &Value,
) -> Vec<Document> {
    tables
        .read()
        .await
        .get(&collection)
        .map(|t| t.query_eq(field, value))
        .unwrap_or_default()
}

/// Document store held entirely in memory.
///
/// Used by tests and by the CLI's `memory` backend. Wrap in an `Arc` to
/// share one store between services.
pub struct MemoryStore {
    tables: RwLock<HashMap<Collection, Table>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tables: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.tables
            .read()
            .await
            .get(&collection)
            .map(|t| t.docs().len())
            .unwrap_or(0)
    }

    fn publish(&self, event: ChangeEvent) {
        tracing::debug!(
            collection = %event.collection,
            id = %event.id,
            kind = ?event.kind,
            "document changed"
        );
        // No receivers is the normal case outside live views.
        let _ = self.events.send(event);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(read_get(&self.tables, collection, id).await)
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> StoreResult<()> {
        let event = {
            let mut tables = self.tables.write().await;
            tables.entry(collection).or_default().set(collection, id, data)?
        };
        self.publish(event);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, fields: Value) -> StoreResult<()> {
        let event = {
            let mut tables = self.tables.write().await;
            tables
                .entry(collection)
                .or_default()
                .update(collection, id, fields)?
        };
        self.publish(event);
        Ok(())
    }

    async fn create(&self, collection: Collection, data: Value) -> StoreResult<String> {
        let id = new_document_id();
        self.set(collection, &id, data).await?;
        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let event = {
            let mut tables = self.tables.write().await;
            tables
                .get_mut(&collection)
                .and_then(|t| t.delete(collection, id))
        };
        if let Some(event) = event {
            self.publish(event);
        }
        Ok(())
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(read_list(&self.tables, collection).await)
    }

    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        Ok(read_query(&self.tables, collection, field, value).await)
    }

    fn subscribe(&self, collection: Collection) -> Subscription {
        Subscription::new(collection, self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStoreExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let store = MemoryStore::new();
        store
            .set(Collection::Users, "a@b.in", json!({"email": "a@b.in", "gstin": "X"}))
            .await
            .unwrap();
        store
            .set(Collection::Users, "a@b.in", json!({"email": "a@b.in"}))
            .await
            .unwrap();

        let doc = store.get(Collection::Users, "a@b.in").await.unwrap().unwrap();
        assert!(doc.field("gstin").is_none());
        assert!(store.get(Collection::Users, "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(Collection::Users, "ghost@x.in", json!({"cart": []}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_and_query() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Orders, json!({"email": "a@b.in", "total": 216}))
            .await
            .unwrap();
        store
            .create(Collection::Orders, json!({"email": "c@d.in", "total": 5.99}))
            .await
            .unwrap();

        let mine = store
            .query_eq(Collection::Orders, "email", &json!("a@b.in"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert_eq!(store.count(Collection::Orders).await, 2);
    }

    #[tokio::test]
    async fn test_non_object_bodies_rejected() {
        let store = MemoryStore::new();
        assert!(store.set(Collection::Products, "p", json!([1, 2])).await.is_err());
        assert!(store.create(Collection::Orders, json!(null)).await.is_err());
    }

    #[tokio::test]
    async fn test_subscription_sees_only_its_collection() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe(Collection::Notifications);

        store.set(Collection::Users, "u", json!({})).await.unwrap();
        let id = store
            .create(Collection::Notifications, json!({"title": "Sale"}))
            .await
            .unwrap();

        let event = sub.next().await.unwrap();
        assert_eq!(event.collection, Collection::Notifications);
        assert_eq!(event.id, id);
        assert_eq!(event.kind, ChangeKind::Created);

        store.delete(Collection::Notifications, &id).await.unwrap();
        assert_eq!(sub.next().await.unwrap().kind, ChangeKind::Deleted);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Note {
            title: String,
        }

        let store = MemoryStore::new();
        let note = Note { title: "Hi".into() };
        let id = store.create_as(Collection::Notifications, &note).await.unwrap();
        let back: Option<Note> = store.get_as(Collection::Notifications, &id).await.unwrap();
        assert_eq!(back, Some(note));

        let all: Vec<(String, Note)> = store.list_as(Collection::Notifications).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, id);
    }
}
