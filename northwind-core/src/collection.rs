//! Typed collection access.
//!
//! A [`TypedCollection`] binds a backend to one collection and one document
//! type, handling the conversion between Rust values and BSON on every call.
//!
//! # Example
//!
//! ```ignore
//! let categories = store.typed_collection::<Category>();
//! let id = categories.insert(&beverages).await?;
//! let found = categories.find_by_id(id).await?;
//! ```

use bson::oid::ObjectId;
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::StoreResult,
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a document and returns the ID it was stored under.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if serialization or insertion fails.
    pub async fn insert(&self, document: &D) -> StoreResult<ObjectId> {
        self.backend
            .insert_document(document.to_bson()?, self.name())
            .await
    }

    /// Replaces the stored document with the given ID.
    ///
    /// Returns the number of documents matched, `0` if none had that ID.
    pub async fn replace(&self, id: ObjectId, document: &D) -> StoreResult<u64> {
        self.backend
            .replace_document(id, document.to_bson()?, self.name())
            .await
    }

    /// Deletes documents by ID and returns the number removed.
    pub async fn delete(&self, ids: Vec<ObjectId>) -> StoreResult<u64> {
        self.backend
            .delete_documents(ids, self.name())
            .await
    }

    /// Retrieves documents by ID. Unknown IDs are omitted from the result.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if deserialization or retrieval fails.
    pub async fn get(&self, ids: Vec<ObjectId>) -> StoreResult<Vec<D>> {
        self.backend
            .get_documents(ids, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }

    /// Retrieves a single document by ID, or `None` if it doesn't exist.
    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<D>> {
        Ok(self.get(vec![id]).await?.into_iter().next())
    }

    /// Retrieves every document in the collection.
    ///
    /// One malformed document fails the whole read with
    /// [`StoreError::Validation`](crate::error::StoreError::Validation).
    pub async fn all(&self) -> StoreResult<Vec<D>> {
        self.backend
            .list_documents(self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }
}
