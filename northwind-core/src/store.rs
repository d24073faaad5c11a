//! Document store handle.
//!
//! [`DocumentStore`] owns a backend and hands out typed collections that borrow it.
//! It is created once at startup and shared by reference for the life of the process.
//!
//! ```ignore
//! use northwind_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let products = store.typed_collection::<Product>();
//! ```

use crate::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::Document,
    error::StoreResult,
};

/// A document store bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Checks that the backend can reach its store.
    pub async fn ping(&self) -> StoreResult<()> {
        self.backend.ping().await
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// After shutdown the backend must not be used again.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.backend.shutdown().await
    }
}
