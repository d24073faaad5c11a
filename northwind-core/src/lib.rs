//! Backend-neutral building blocks for the Northwind product repository.
//!
//! This crate has no I/O of its own. It provides:
//!
//! - **Document traits** ([`document`]) - The trait stored records implement, BSON conversion and ID parsing
//! - **Store backend abstraction** ([`backend`]) - The async trait every storage backend implements
//! - **Collections interface** ([`collection`]) - Typed access to one collection
//! - **Document store** ([`store`]) - The handle that owns a backend
//! - **Error handling** ([`error`]) - The closed [`StoreError`](error::StoreError) taxonomy
//!
//! # Example
//!
//! ```ignore
//! use northwind_core::{document::Document, store::DocumentStore};
//!
//! let store = DocumentStore::new(backend);
//! let categories = store.typed_collection::<Category>();
//! let id = categories.insert(&category).await?;
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod store;
