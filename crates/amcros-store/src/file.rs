//! JSON-file document store.
//!
//! Each collection lives in `<data_dir>/<collection>.json` as one object
//! mapping document keys to bodies. The whole file is rewritten after every
//! write, through a temporary file and a rename.

use crate::memory::{new_document_id, read_get, read_list, read_query, Table, EVENT_CAPACITY};
use crate::store::Subscription;
use crate::{ChangeEvent, Collection, Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

pub struct JsonFileStore {
    shared: Arc<Shared>,
}

struct Shared {
    dir: PathBuf,
    tables: RwLock<HashMap<Collection, Table>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl JsonFileStore {
    /// Open (creating if needed) a data directory and load every collection.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let mut tables = HashMap::new();
        for collection in Collection::ALL {
            let path = collection_path(&dir, collection);
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let docs: BTreeMap<String, Value> = serde_json::from_slice(&bytes)?;
                    tracing::debug!(%collection, documents = docs.len(), "loaded collection");
                    tables.insert(collection, Table::from_docs(docs));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            shared: Arc::new(Shared {
                dir,
                tables: RwLock::new(tables),
                events,
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.shared.dir
    }

    /// Run a write on its own task.
    ///
    /// The disk write and the in-memory swap finish together even when the
    /// caller stops waiting, so the file never runs ahead of the table.
    async fn write_with<F>(&self, collection: Collection, op: F) -> StoreResult<Option<ChangeEvent>>
    where
        F: FnOnce(&mut Table) -> StoreResult<Option<ChangeEvent>> + Send + 'static,
    {
        let shared = self.shared.clone();
        tokio::spawn(async move { shared.write_with(collection, op).await })
            .await
            .map_err(|e| StoreError::Unavailable(format!("write task failed: {}", e)))?
    }
}

impl Shared {
    /// Apply `op` to a copy of the collection, persist the copy, then swap it in.
    /// A failed write leaves both disk and memory unchanged.
    async fn write_with<F>(&self, collection: Collection, op: F) -> StoreResult<Option<ChangeEvent>>
    where
        F: FnOnce(&mut Table) -> StoreResult<Option<ChangeEvent>>,
    {
        let mut tables = self.tables.write().await;
        let mut table = tables.get(&collection).cloned().unwrap_or_default();
        let Some(event) = op(&mut table)? else {
            return Ok(None);
        };

        persist(&self.dir, collection, &table).await?;
        tables.insert(collection, table);
        drop(tables);

        tracing::debug!(%collection, id = %event.id, kind = ?event.kind, "document persisted");
        let _ = self.events.send(event.clone());
        Ok(Some(event))
    }
}

fn collection_path(dir: &Path, collection: Collection) -> PathBuf {
    dir.join(format!("{}.json", collection.as_str()))
}

async fn persist(dir: &Path, collection: Collection, table: &Table) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(table.docs())?;
    let path = collection_path(dir, collection);
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, &path).await?;
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(read_get(&self.shared.tables, collection, id).await)
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> StoreResult<()> {
        let id = id.to_string();
        self.write_with(collection, move |t| t.set(collection, &id, data).map(Some))
            .await?;
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, fields: Value) -> StoreResult<()> {
        let id = id.to_string();
        self.write_with(collection, move |t| t.update(collection, &id, fields).map(Some))
            .await?;
        Ok(())
    }

    async fn create(&self, collection: Collection, data: Value) -> StoreResult<String> {
        let id = new_document_id();
        self.set(collection, &id, data).await?;
        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.write_with(collection, move |t| Ok(t.delete(collection, &id)))
            .await?;
        Ok(())
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(read_list(&self.shared.tables, collection).await)
    }

    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        Ok(read_query(&self.shared.tables, collection, field, value).await)
    }

    fn subscribe(&self, collection: Collection) -> Subscription {
        Subscription::new(collection, self.shared.events.subscribe())
    }
}
