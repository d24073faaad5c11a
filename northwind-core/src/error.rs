//! Error types and result types for document store operations.
//!
//! Every failure a backend surfaces is classified into one of the four
//! variants of [`StoreError`], so callers can branch on the kind of failure
//! instead of matching on driver-specific messages.
//! Use [`StoreResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No document with the given ID exists in the collection.
    #[error("Document {id} not found in collection {collection}")]
    NotFound {
        /// Name of the collection that was searched.
        collection: String,
        /// Hex form of the requested document ID.
        id: String,
    },
    /// The input was rejected: a malformed ID, a document that could not be
    /// (de)serialized, or a write the store refused (duplicate key, schema
    /// validation).
    #[error("Validation error: {0}")]
    Validation(String),
    /// The store could not be reached, or the client was already shut down.
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),
    /// Any other failure reported by the backend.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Creates a [`StoreError::NotFound`] for a document in a collection.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Returns `true` if the error is a [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// A specialized `Result` type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Validation(err.to_string())
    }
}
