//! MongoDB backend implementation for the Northwind store.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Documents are stored as-is, so field names written by other clients of the
//! same database are read back unchanged.
//!
//! To use this backend, enable the `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! northwind = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Error classification** - Driver errors are mapped onto the closed `StoreError` enum
//! - **Lazy connection** - Building the store only parses the connection string
//!
//! # Example
//!
//! ```ignore
//! use northwind::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "Northwind")
//!     .app_name("northwind")
//!     .build()
//!     .await?;
//! ```

pub mod store;
mod error;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
