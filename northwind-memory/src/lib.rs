//! In-memory backend implementation for the Northwind store.
//!
//! This crate provides an in-memory implementation of the `StoreBackend` trait. It
//! follows the MongoDB backend's observable behaviour: IDs are assigned on insert,
//! replacing or deleting a missing ID reports a zero count instead of failing, and
//! unknown collections read as empty. That makes it the test double for the
//! product repository.
//!
//! # Features
//!
//! - **Thread-safe** - Uses async-aware read-write locks for concurrent access
//! - **Ordered reads** - Collections list in insertion order
//! - **Seeding** - The builder can preload documents
//!
//! # Example
//!
//! ```ignore
//! use northwind_memory::InMemoryStore;
//! use northwind_core::{backend::StoreBackendBuilder, store::DocumentStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! ```

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
