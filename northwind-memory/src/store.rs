//! In-memory storage implementation for document stores.
//!
//! This module provides an in-memory backend that stores documents as BSON
//! documents behind an async-safe read-write lock. Its observable behaviour follows
//! the MongoDB backend so it can stand in for it in tests.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};
use tracing::trace;

use northwind_core::{
    error::{StoreError, StoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

/// Documents of one collection, in insertion order.
type CollectionDocs = Vec<Document>;
type StoreMap = HashMap<String, CollectionDocs>;


/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data, so a test can keep one clone to inspect the
/// store while a repository owns another.
///
/// # Performance
///
/// Every lookup scans the collection. It is meant for tests and small local datasets.
///
/// # Example
///
/// ```ignore
/// use northwind_memory::InMemoryStore;
/// use northwind_core::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = store
///     .insert_document(Bson::Document(doc! { "name": "Beverages" }), "categories")
///     .await?;
/// let docs = store.get_documents(vec![id], "categories").await?;
/// assert_eq!(docs.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn into_document(document: Bson) -> StoreResult<Document> {
        match document {
            Bson::Document(document) => Ok(document),
            other => Err(StoreError::Validation(format!(
                "Expected a document, found {:?}",
                other.element_type()
            ))),
        }
    }

    fn document_id(document: &Document) -> Option<ObjectId> {
        document.get_object_id("_id").ok()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> StoreResult<ObjectId> {
        let mut document = Self::into_document(document)?;
        let id = match Self::document_id(&document) {
            Some(id) => id,
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        let mut store = self.store.write().await;
        let docs = store
            .entry(collection.to_string())
            .or_default();

        if docs.iter().any(|doc| Self::document_id(doc) == Some(id)) {
            return Err(StoreError::Validation(format!(
                "Duplicate key: document {id} already exists in collection {collection}"
            )));
        }

        trace!(%id, collection, "Inserting document");
        docs.push(document);

        Ok(id)
    }

    async fn replace_document(&self, id: ObjectId, document: Bson, collection: &str) -> StoreResult<u64> {
        let mut replacement = Self::into_document(document)?;
        replacement.insert("_id", id);

        let mut store = self.store.write().await;
        let existing = store
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| Self::document_id(doc) == Some(id)));

        match existing {
            Some(doc) => {
                *doc = replacement;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<u64> {
        let mut store = self.store.write().await;
        let docs = match store.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(0),
        };

        let before = docs.len();
        docs.retain(|doc| !Self::document_id(doc).is_some_and(|id| ids.contains(&id)));

        Ok((before - docs.len()) as u64)
    }

    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let docs = match store.get(collection) {
            Some(docs) => docs,
            None => return Ok(vec![]),
        };

        Ok(
            docs
                .iter()
                .filter(|doc| Self::document_id(doc).is_some_and(|id| ids.contains(&id)))
                .cloned()
                .map(Bson::Document)
                .collect()
        )
    }

    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Bson>> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .map(|docs| docs.iter().cloned().map(Bson::Document).collect())
                .unwrap_or_default()
        )
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// Optionally seeds collections with existing documents, which is how tests
/// set up data written by other clients.
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    seed: Vec<(String, Document)>,
}

impl InMemoryStoreBuilder {
    /// Adds a document to a collection when the store is built.
    pub fn with_document(mut self, collection: &str, document: Document) -> Self {
        self.seed.push((collection.to_string(), document));
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        let store = InMemoryStore::new();

        for (collection, document) in self.seed {
            store
                .insert_document(Bson::Document(document), &collection)
                .await?;
        }

        Ok(store)
    }
}
