//! Convenient re-exports of commonly used types from northwind.
//!
//! ```ignore
//! use northwind::prelude::*;
//! ```

pub use northwind_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::TypedCollection,
    document::{Document, DocumentExt, parse_object_id},
    error::{StoreError, StoreResult},
    store::DocumentStore,
};

pub use crate::{
    config::{ConfigError, StoreConfig},
    models::{Category, PopulatedProduct, Product},
    repository::ProductRepository,
};
