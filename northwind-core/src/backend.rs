//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations,
//! allowing the same repository code to run against MongoDB in production and
//! against an in-memory store in tests.
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for the storage
//! operations the repositories need: inserting, replacing, deleting, fetching by ID,
//! and listing a whole collection. Every method is a single round trip to the store.
//!
//! # Examples
//!
//! ```ignore
//! use northwind_core::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let id = backend
//!     .insert_document(Bson::Document(doc! { "name": "Beverages" }), "categories")
//!     .await?;
//! let found = backend.get_documents(vec![id], "categories").await?;
//! ```

use async_trait::async_trait;
use bson::{Bson, oid::ObjectId};
use std::fmt::Debug;

use crate::error::StoreResult;

/// Abstract interface for document storage backends.
///
/// Documents are exchanged as BSON values whose `_id` field holds an
/// [`ObjectId`]. Implementations must be thread-safe and support concurrent
/// access from multiple async tasks. No method retries on failure.
///
/// # Error Handling
///
/// Failures are classified into [`StoreError`](crate::error::StoreError) by the
/// backend, so callers see the same error kinds regardless of implementation.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a document into a collection and returns its ID.
    ///
    /// If the document carries an `_id` it is kept, otherwise the store assigns
    /// a fresh one. Inserting an `_id` that already exists fails with
    /// [`StoreError::Validation`](crate::error::StoreError::Validation).
    async fn insert_document(&self, document: Bson, collection: &str) -> StoreResult<ObjectId>;

    /// Replaces the document with the given ID, keeping its ID.
    ///
    /// Returns the number of documents matched: `0` when no document has that ID,
    /// in which case nothing is written and no error is raised.
    async fn replace_document(
        &self,
        id: ObjectId,
        document: Bson,
        collection: &str,
    ) -> StoreResult<u64>;

    /// Deletes documents from a collection by their IDs.
    ///
    /// IDs that don't exist are skipped. Returns the number of documents removed.
    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<u64>;

    /// Retrieves documents from a collection by their IDs.
    ///
    /// Unknown IDs are omitted from the result. Order is not guaranteed to match
    /// the order of `ids`.
    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<Vec<Bson>>;

    /// Returns every document in a collection, in the store's natural order.
    ///
    /// A collection that doesn't exist reads as empty.
    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Bson>>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_document(&self, document: Bson, collection: &str) -> StoreResult<ObjectId> {
        (*self).insert_document(document, collection).await
    }

    async fn replace_document(
        &self,
        id: ObjectId,
        document: Bson,
        collection: &str,
    ) -> StoreResult<u64> {
        (*self)
            .replace_document(id, document, collection)
            .await
    }

    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<u64> {
        (*self).delete_documents(ids, collection).await
    }

    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<Vec<Bson>> {
        (*self).get_documents(ids, collection).await
    }

    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Bson>> {
        (*self).list_documents(collection).await
    }

    async fn ping(&self) -> StoreResult<()> {
        (*self).ping().await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
