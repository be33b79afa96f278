//! Product listing backed by the `products` collection.

use crate::AppResult;
use amcros_commerce::catalog::Product;
use amcros_commerce::search::SearchQuery;
use amcros_commerce::CommerceError;
use amcros_store::{Collection, Document, DocumentStore, DocumentStoreExt, StoreError};
use serde_json::Value;
use std::sync::Arc;

pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every product, in document-key order.
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let docs = self.store.list(Collection::Products).await?;
        let mut products = Vec::with_capacity(docs.len());
        for doc in docs {
            products.push(decode_product(doc)?);
        }
        Ok(products)
    }

    /// Filter and sort the catalog.
    pub async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Product>> {
        let products = self.list().await?;
        Ok(query.apply(&products).into_iter().cloned().collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Product> {
        match self.store.get(Collection::Products, id).await? {
            Some(doc) => Ok(decode_product(doc)?),
            None => Err(CommerceError::ProductNotFound(id.to_string()).into()),
        }
    }

    /// Write products that are not in the store yet. Returns how many were added.
    pub async fn seed(&self, products: &[Product]) -> AppResult<usize> {
        let mut added = 0;
        for product in products {
            if self
                .store
                .get(Collection::Products, product.id.as_str())
                .await?
                .is_some()
            {
                continue;
            }
            self.store
                .set_as(Collection::Products, product.id.as_str(), product)
                .await?;
            added += 1;
        }
        if added > 0 {
            tracing::info!(added, "seeded catalog");
        }
        Ok(added)
    }
}

/// Product documents do not have to carry their own id; the key is authoritative.
pub(crate) fn decode_product(doc: Document) -> Result<Product, StoreError> {
    let Document { id, mut data } = doc;
    match data.as_object_mut() {
        Some(fields) => {
            fields.insert("id".to_string(), Value::String(id.clone()));
        }
        None => {
            return Err(StoreError::InvalidDocument {
                id,
                reason: "product is not an object".to_string(),
            })
        }
    }
    Ok(serde_json::from_value(data)?)
}
