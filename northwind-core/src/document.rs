//! Core traits for document representation and serialization.
//!
//! This module provides the trait that all stored documents implement,
//! the conversion between documents and BSON, and the
//! parser used to turn caller-supplied ID strings into [`ObjectId`]s.

use bson::{Bson, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{StoreError, StoreResult};

/// Core trait that all documents stored in a document store must implement.
///
/// The identifier is optional because a document that has not been stored yet
/// has no ID: the store assigns one on insert. Implementors should serialize
/// the ID under the `_id` key and skip it when absent.
///
/// # Example
///
/// ```ignore
/// use northwind_core::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Supplier {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub company_name: String,
/// }
///
/// impl Document for Supplier {
///     fn id(&self) -> Option<&ObjectId> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: ObjectId) {
///         self.id = Some(id);
///     }
///
///     fn collection_name() -> &'static str {
///         "suppliers"
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns this document's identifier, if it has been assigned one.
    fn id(&self) -> Option<&ObjectId>;

    /// Assigns this document's identifier.
    fn set_id(&mut self, id: ObjectId);

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    fn to_bson(&self) -> StoreResult<Bson>;

    /// Creates a document from a BSON value.
    fn from_bson(bson: Bson) -> StoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> StoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> StoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Parses a 24 character hex string into an [`ObjectId`].
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if `id` is not a valid object ID.
pub fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|e| StoreError::Validation(format!("Invalid document id '{id}': {e}")))
}
