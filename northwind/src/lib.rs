//! Product and category storage for the Northwind database.
//!
//! This crate is the primary entry point. It provides the [`ProductRepository`],
//! the record shapes it reads and writes, and the configuration used to connect
//! it to MongoDB. The backend-neutral building blocks are re-exported from
//! `northwind-core`.
//!
//! # Features
//!
//! - **Populated listing** - Products are listed with their category resolved in two round trips
//! - **Stored field names** - Records keep the field names already used by the database
//! - **Multiple backends** - MongoDB in production, an in-memory store for tests
//! - **Closed error taxonomy** - Every failure is one of four [`StoreError`](error::StoreError) kinds
//!
//! # Quick Start
//!
//! ```ignore
//! use northwind::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let repo = ProductRepository::new(DocumentStore::new(InMemoryStore::new()));
//!
//!     let beverages = repo
//!         .add_category(Category::new("Beverages", "Soft drinks, coffees, teas, beers, and ales"))
//!         .await
//!         .unwrap();
//!
//!     repo.add(Product::new("Chai", 18.0, 39).in_category(beverages.id.unwrap()))
//!         .await
//!         .unwrap();
//!
//!     for product in repo.list_all().await.unwrap() {
//!         println!("{} ({:?})", product.name, product.category.map(|c| c.name));
//!     }
//! }
//! ```
//!
//! With the `mongodb` feature enabled, [`connect`] builds a repository from a
//! [`StoreConfig`](config::StoreConfig):
//!
//! ```ignore
//! let repo = northwind::connect(&StoreConfig::load()?).await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod config;
pub mod models;
pub mod prelude;
pub mod repository;
#[cfg(feature = "mongodb")]
mod startup;

pub use northwind_core::{backend, collection, document, error, store};
pub use repository::ProductRepository;
#[cfg(feature = "mongodb")]
pub use startup::connect;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use northwind_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use northwind_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
