//! # Product Repository
//!
//! CRUD operations over the `products` collection, plus the category
//! operations needed to populate it.
//!
//! ## Reads
//! ```text
//! list_all()                          get_one(id)
//!    │                                   │
//!    ├─► products: find {}               └─► products: find {_id}
//!    │
//!    └─► categories: find {_id: {$in: [distinct productCategory]}}
//!        (skipped when no product has a reference)
//! ```
//!
//! Known gaps, kept on purpose:
//! - `add` and `update` store the category reference without checking that the
//!   category exists.
//! - `update` succeeds and echoes its input even when no stored product matched.

use std::collections::HashMap;

use bson::oid::ObjectId;
use tracing::{debug, warn};

use northwind_core::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::{Document, parse_object_id},
    error::{StoreError, StoreResult},
    store::DocumentStore,
};

use crate::models::{Category, PopulatedProduct, Product};

/// Repository for product and category operations.
///
/// Created once at startup around the store handle and shared by reference.
/// Every call is an independent round trip; nothing is cached between calls.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(DocumentStore::new(backend));
///
/// let chai = repo.add(Product::new("Chai", 18.0, 39).in_category(beverages)).await?;
/// let listed = repo.list_all().await?;
/// ```
#[derive(Debug)]
pub struct ProductRepository<B: StoreBackend> {
    store: DocumentStore<B>,
}

impl<B: StoreBackend> ProductRepository<B> {
    /// Creates a new ProductRepository.
    pub fn new(store: DocumentStore<B>) -> Self {
        ProductRepository { store }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    /// Consumes the repository and returns its store handle, e.g. to shut it down.
    pub fn into_store(self) -> DocumentStore<B> {
        self.store
    }

    fn products(&self) -> TypedCollection<'_, B, Product> {
        self.store.typed_collection::<Product>()
    }

    fn categories(&self) -> TypedCollection<'_, B, Category> {
        self.store.typed_collection::<Category>()
    }

    /// Lists every product with its category resolved.
    ///
    /// References to categories that don't exist resolve to `None`. An empty
    /// collection yields an empty list.
    pub async fn list_all(&self) -> StoreResult<Vec<PopulatedProduct>> {
        let products = self.products().all().await?;

        let mut category_ids = products
            .iter()
            .filter_map(|product| product.category)
            .collect::<Vec<ObjectId>>();
        category_ids.sort();
        category_ids.dedup();

        let categories = if category_ids.is_empty() {
            HashMap::new()
        } else {
            self.categories()
                .get(category_ids)
                .await?
                .into_iter()
                .filter_map(|category| category.id.map(|id| (id, category)))
                .collect::<HashMap<ObjectId, Category>>()
        };

        debug!(
            products = products.len(),
            categories = categories.len(),
            "Listed products"
        );

        Ok(products
            .into_iter()
            .map(|product| {
                let category = product
                    .category
                    .and_then(|id| categories.get(&id).cloned());
                product.populate(category)
            })
            .collect())
    }

    /// Gets a product by its ID. The category is left as a reference.
    ///
    /// ## Returns
    /// * `Err(StoreError::Validation)` - `id` is not a valid object ID
    /// * `Err(StoreError::NotFound)` - no product has that ID
    pub async fn get_one(&self, id: &str) -> StoreResult<Product> {
        let id = parse_object_id(id)?;

        debug!(%id, "Fetching product");

        self.products()
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(Product::collection_name(), id.to_hex()))
    }

    /// Stores a new product and returns it with its assigned ID.
    ///
    /// The category reference is stored as given.
    pub async fn add(&self, mut product: Product) -> StoreResult<Product> {
        let id = self.products().insert(&product).await?;
        product.set_id(id);

        debug!(%id, name = %product.name, "Added product");

        Ok(product)
    }

    /// Overwrites the stored product that has the same ID as `product`.
    ///
    /// Returns `product` itself, not a re-read of the stored record. When no
    /// stored product matches (including when `product` has no ID, in which case
    /// it is given a fresh one) nothing is written and the call still succeeds.
    pub async fn update(&self, mut product: Product) -> StoreResult<Product> {
        let id = match product.id {
            Some(id) => id,
            None => {
                let id = ObjectId::new();
                product.set_id(id);
                id
            }
        };

        let matched = self.products().replace(id, &product).await?;

        if matched == 0 {
            warn!(%id, "Update matched no product; nothing was written");
        } else {
            debug!(%id, name = %product.name, "Updated product");
        }

        Ok(product)
    }

    /// Deletes a product. Deleting an ID that doesn't exist is not an error.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let id = parse_object_id(id)?;
        let deleted = self.products().delete(vec![id]).await?;

        debug!(%id, deleted, "Removed product");

        Ok(())
    }

    /// Stores a new category and returns it with its assigned ID.
    pub async fn add_category(&self, mut category: Category) -> StoreResult<Category> {
        let id = self.categories().insert(&category).await?;
        category.set_id(id);

        debug!(%id, name = %category.name, "Added category");

        Ok(category)
    }

    /// Lists every category.
    pub async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.categories().all().await
    }

    /// Gets a category by its ID, failing as [`get_one`](Self::get_one) does.
    pub async fn get_category(&self, id: &str) -> StoreResult<Category> {
        let id = parse_object_id(id)?;

        self.categories()
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(Category::collection_name(), id.to_hex()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bson::{Bson, doc};
    use northwind_core::backend::StoreBackendBuilder;
    use northwind_memory::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn repository() -> (ProductRepository<InMemoryStore>, InMemoryStore) {
        let backend = InMemoryStore::new();
        (ProductRepository::new(DocumentStore::new(backend.clone())), backend)
    }

    fn beverages() -> Category {
        Category::new("Beverages", "Soft drinks, coffees, teas, beers, and ales")
    }

    /// Counts round trips to the wrapped store.
    #[derive(Debug, Default)]
    struct CountingBackend {
        inner: InMemoryStore,
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn reset(&self) {
            self.calls.store(0, Ordering::SeqCst);
        }

        fn record(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl StoreBackend for CountingBackend {
        async fn insert_document(&self, document: Bson, collection: &str) -> StoreResult<ObjectId> {
            self.record();
            self.inner.insert_document(document, collection).await
        }

        async fn replace_document(&self, id: ObjectId, document: Bson, collection: &str) -> StoreResult<u64> {
            self.record();
            self.inner.replace_document(id, document, collection).await
        }

        async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<u64> {
            self.record();
            self.inner.delete_documents(ids, collection).await
        }

        async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<Vec<Bson>> {
            self.record();
            self.inner.get_documents(ids, collection).await
        }

        async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Bson>> {
            self.record();
            self.inner.list_documents(collection).await
        }

        async fn ping(&self) -> StoreResult<()> {
            self.record();
            Ok(())
        }
    }

    /// A store that is never reachable.
    #[derive(Debug)]
    struct UnreachableBackend;

    impl UnreachableBackend {
        fn error() -> StoreError {
            StoreError::ConnectionFailure("server selection timed out".into())
        }
    }

    #[async_trait]
    impl StoreBackend for UnreachableBackend {
        async fn insert_document(&self, _document: Bson, _collection: &str) -> StoreResult<ObjectId> {
            Err(Self::error())
        }

        async fn replace_document(&self, _id: ObjectId, _document: Bson, _collection: &str) -> StoreResult<u64> {
            Err(Self::error())
        }

        async fn delete_documents(&self, _ids: Vec<ObjectId>, _collection: &str) -> StoreResult<u64> {
            Err(Self::error())
        }

        async fn get_documents(&self, _ids: Vec<ObjectId>, _collection: &str) -> StoreResult<Vec<Bson>> {
            Err(Self::error())
        }

        async fn list_documents(&self, _collection: &str) -> StoreResult<Vec<Bson>> {
            Err(Self::error())
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(Self::error())
        }
    }

    #[tokio::test]
    async fn add_then_get_one_returns_the_same_fields() {
        let (repo, _) = repository();

        let added = repo.add(Product::new("Aniseed Syrup", 10.0, 13)).await.unwrap();
        let id = added.id.expect("add assigns an id");

        let fetched = repo.get_one(&id.to_hex()).await.unwrap();

        assert_eq!(fetched.name, "Aniseed Syrup");
        assert_eq!(fetched.price, 10.0);
        assert_eq!(fetched.stock, 13);
        assert_eq!(fetched.category, None);
        assert_eq!(fetched, added);
    }

    #[tokio::test]
    async fn add_chai_with_a_category_reference() {
        let (repo, _) = repository();
        let category_id = repo.add_category(beverages()).await.unwrap().id.unwrap();

        let chai = repo
            .add(Product::new("Chai", 18.0, 39).in_category(category_id))
            .await
            .unwrap();

        assert!(chai.id.is_some());
        assert_eq!(chai.name, "Chai");
        assert_eq!(chai.price, 18.0);
        assert_eq!(chai.stock, 39);
        assert_eq!(chai.category, Some(category_id));

        let fetched = repo.get_one(&chai.id.unwrap().to_hex()).await.unwrap();
        assert_eq!(fetched, chai);
    }

    #[tokio::test]
    async fn add_does_not_check_the_category_reference() {
        let (repo, backend) = repository();

        let orphan = repo
            .add(Product::new("Chang", 19.0, 17).in_category(ObjectId::new()))
            .await
            .unwrap();

        assert!(orphan.id.is_some());
        assert_eq!(backend.count("products").await, 1);
        assert_eq!(backend.count("categories").await, 0);
    }

    #[tokio::test]
    async fn list_all_embeds_the_full_category() {
        let (repo, _) = repository();
        let category = repo.add_category(beverages()).await.unwrap();
        repo.add(Product::new("Chai", 18.0, 39).in_category(category.id.unwrap()))
            .await
            .unwrap();

        let listed = repo.list_all().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Chai");
        assert_eq!(listed[0].category, Some(category));
    }

    #[tokio::test]
    async fn list_all_on_an_empty_store_is_empty() {
        let (repo, _) = repository();

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_resolves_missing_and_dangling_references_to_none() {
        let (repo, _) = repository();
        let category = repo.add_category(beverages()).await.unwrap();
        repo.add(Product::new("Chai", 18.0, 39).in_category(category.id.unwrap())).await.unwrap();
        repo.add(Product::new("Chang", 19.0, 17).in_category(ObjectId::new())).await.unwrap();
        repo.add(Product::new("Aniseed Syrup", 10.0, 13)).await.unwrap();

        let listed = repo.list_all().await.unwrap();
        let by_name = listed
            .iter()
            .map(|product| (product.name.as_str(), product.category.as_ref()))
            .collect::<HashMap<_, _>>();

        assert_eq!(by_name.len(), 3);
        assert_eq!(by_name["Chai"], Some(&category));
        assert_eq!(by_name["Chang"], None);
        assert_eq!(by_name["Aniseed Syrup"], None);
    }

    #[tokio::test]
    async fn list_all_reads_products_written_by_other_clients() {
        let category_id = ObjectId::new();
        let backend = InMemoryStore::builder()
            .with_document("categories", doc! { "_id": category_id, "name": "Beverages", "description": "Soft drinks" })
            .with_document("products", doc! { "name": "Chai", "price": 18, "stock": 39.0, "productCategory": category_id })
            .build()
            .await
            .unwrap();
        let repo = ProductRepository::new(DocumentStore::new(backend));

        let listed = repo.list_all().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].stock, 39);
        assert_eq!(listed[0].category.as_ref().map(|c| c.name.as_str()), Some("Beverages"));
    }

    #[tokio::test]
    async fn list_all_reads_incomplete_products() {
        let backend = InMemoryStore::builder()
            .with_document("products", doc! { "name": "Chai", "price": 18.0, "stock": 39 })
            .with_document("products", doc! { "name": "Ikura" })
            .build()
            .await
            .unwrap();
        let repo = ProductRepository::new(DocumentStore::new(backend));

        let listed = repo.list_all().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].name, "Ikura");
        assert_eq!(listed[1].price, 0.0);
        assert_eq!(listed[1].stock, 0);
        assert_eq!(listed[1].category, None);
    }

    #[tokio::test]
    async fn get_one_with_malformed_id_is_a_validation_error() {
        let (repo, _) = repository();

        let err = repo.get_one("not-an-id").await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn get_one_with_unknown_id_is_not_found() {
        let (repo, _) = repository();

        let err = repo.get_one(&ObjectId::new().to_hex()).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_overwrites_the_stored_product() {
        let (repo, _) = repository();
        let mut chai = repo.add(Product::new("Chai", 18.0, 39)).await.unwrap();

        chai.price = 19.5;
        chai.stock = 0;
        let returned = repo.update(chai.clone()).await.unwrap();

        assert_eq!(returned, chai);
        assert_eq!(repo.get_one(&chai.id.unwrap().to_hex()).await.unwrap(), chai);
    }

    #[tokio::test]
    async fn update_with_unknown_id_echoes_input_and_writes_nothing() {
        let (repo, backend) = repository();
        let chai = repo.add(Product::new("Chai", 18.0, 39)).await.unwrap();

        let mut ghost = Product::new("Ghost", 1.0, 1);
        ghost.set_id(ObjectId::new());
        let returned = repo.update(ghost.clone()).await.unwrap();

        assert_eq!(returned, ghost);
        assert_eq!(backend.count("products").await, 1);
        assert_eq!(repo.get_one(&chai.id.unwrap().to_hex()).await.unwrap(), chai);
    }

    #[tokio::test]
    async fn update_without_id_echoes_input_and_writes_nothing() {
        let (repo, backend) = repository();
        let chai = repo.add(Product::new("Chai", 18.0, 39)).await.unwrap();

        let returned = repo.update(Product::new("Chai", 99.0, 1)).await.unwrap();

        assert!(returned.id.is_some());
        assert_ne!(returned.id, chai.id);
        assert_eq!(returned.price, 99.0);
        assert_eq!(backend.count("products").await, 1);
        assert_eq!(repo.get_one(&chai.id.unwrap().to_hex()).await.unwrap(), chai);
    }

    #[tokio::test]
    async fn remove_deletes_the_product() {
        let (repo, _) = repository();
        let id = repo.add(Product::new("Chai", 18.0, 39)).await.unwrap().id.unwrap().to_hex();

        repo.remove(&id).await.unwrap();

        assert!(repo.get_one(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn remove_of_unknown_id_succeeds() {
        let (repo, _) = repository();

        repo.remove(&ObjectId::new().to_hex()).await.unwrap();
    }

    #[tokio::test]
    async fn remove_with_malformed_id_is_a_validation_error() {
        let (repo, _) = repository();

        assert!(matches!(
            repo.remove("42").await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn category_operations() {
        let (repo, _) = repository();
        let added = repo.add_category(beverages()).await.unwrap();
        let condiments = repo
            .add_category(Category::new("Condiments", "Sweet and savory sauces"))
            .await
            .unwrap();

        let id = added.id.unwrap().to_hex();
        assert_eq!(repo.get_category(&id).await.unwrap(), added);
        assert_eq!(repo.list_categories().await.unwrap(), vec![added, condiments]);
        assert!(repo.get_category(&ObjectId::new().to_hex()).await.unwrap_err().is_not_found());
        assert!(matches!(
            repo.get_category("beverages").await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn each_operation_is_one_round_trip() {
        let repo = ProductRepository::new(DocumentStore::new(CountingBackend::default()));
        let backend = repo.store().backend();

        let chai = repo.add(Product::new("Chai", 18.0, 39)).await.unwrap();
        assert_eq!(backend.calls(), 1);
        let id = chai.id.unwrap().to_hex();

        backend.reset();
        repo.get_one(&id).await.unwrap();
        assert_eq!(backend.calls(), 1);

        backend.reset();
        repo.update(chai.clone()).await.unwrap();
        assert_eq!(backend.calls(), 1);

        backend.reset();
        repo.remove(&id).await.unwrap();
        assert_eq!(backend.calls(), 1);

        backend.reset();
        assert!(repo.get_one("malformed").await.is_err());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn list_all_joins_with_one_extra_round_trip() {
        let repo = ProductRepository::new(DocumentStore::new(CountingBackend::default()));
        let backend = repo.store().backend();

        repo.add(Product::new("Aniseed Syrup", 10.0, 13)).await.unwrap();
        backend.reset();
        repo.list_all().await.unwrap();
        assert_eq!(backend.calls(), 1);

        let category = repo.add_category(beverages()).await.unwrap().id.unwrap();
        repo.add(Product::new("Chai", 18.0, 39).in_category(category)).await.unwrap();
        repo.add(Product::new("Chang", 19.0, 17).in_category(category)).await.unwrap();
        backend.reset();
        repo.list_all().await.unwrap();
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn store_errors_propagate_unchanged() {
        let repo = ProductRepository::new(DocumentStore::new(UnreachableBackend));
        let expected = UnreachableBackend::error();
        let id = ObjectId::new().to_hex();

        assert_eq!(repo.list_all().await.unwrap_err(), expected);
        assert_eq!(repo.get_one(&id).await.unwrap_err(), expected);
        assert_eq!(repo.add(Product::new("Chai", 18.0, 39)).await.unwrap_err(), expected);
        assert_eq!(repo.update(Product::new("Chai", 18.0, 39)).await.unwrap_err(), expected);
        assert_eq!(repo.remove(&id).await.unwrap_err(), expected);
    }
}
