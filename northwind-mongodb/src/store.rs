use std::time::Duration;
use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Bson, Document, doc, oid::ObjectId};
use mongodb::{Client, Collection as MongoCollection, options::ClientOptions};
use tracing::debug;
use northwind_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
};

use crate::error::classify;


#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(uri: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(uri, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn into_document(document: Bson) -> StoreResult<Document> {
        match document {
            Bson::Document(document) => Ok(document),
            other => Err(StoreError::Validation(format!(
                "Expected a document, found {:?}",
                other.element_type()
            ))),
        }
    }

    async fn collect(&self, cursor: mongodb::Cursor<Document>) -> StoreResult<Vec<Bson>> {
        Ok(
            cursor
                .try_collect::<Vec<Document>>()
                .await
                .map_err(classify)?
                .into_iter()
                .map(Bson::Document)
                .collect()
        )
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> StoreResult<ObjectId> {
        let result = self.get_collection(collection)
            .insert_one(Self::into_document(document)?)
            .await
            .map_err(classify)?;

        debug!(collection, inserted_id = %result.inserted_id, "Inserted document");

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Unknown(format!(
                "Store assigned a non-ObjectId id {} in collection {collection}",
                result.inserted_id
            )))
    }

    async fn replace_document(&self, id: ObjectId, document: Bson, collection: &str) -> StoreResult<u64> {
        let mut replacement = Self::into_document(document)?;
        replacement.remove("_id");

        let result = self.get_collection(collection)
            .replace_one(doc! { "_id": id }, replacement)
            .await
            .map_err(classify)?;

        debug!(
            collection,
            %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "Replaced document"
        );

        Ok(result.matched_count)
    }

    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<u64> {
        let result = self.get_collection(collection)
            .delete_many(doc! { "_id": { "$in": ids } })
            .await
            .map_err(classify)?;

        debug!(collection, deleted = result.deleted_count, "Deleted documents");

        Ok(result.deleted_count)
    }

    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> StoreResult<Vec<Bson>> {
        let cursor = self.get_collection(collection)
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(classify)?;

        self.collect(cursor).await
    }

    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Bson>> {
        let cursor = self.get_collection(collection)
            .find(doc! {})
            .await
            .map_err(classify)?;

        self.collect(cursor).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    uri: String,
    database: String,
    app_name: Option<String>,
    server_selection_timeout: Option<Duration>,
}

impl MongoDbStoreBuilder {
    pub fn new(uri: &str, database: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
            app_name: None,
            server_selection_timeout: None,
        }
    }

    /// Sets the application name reported to the server.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Sets how long an operation waits for a usable server before failing.
    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the connection string and creates the client.
    ///
    /// No connection is opened here; the driver connects lazily on the first
    /// operation, so an unreachable server surfaces on first use (or on `ping`).
    async fn build(self) -> StoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| StoreError::ConnectionFailure(e.to_string()))?;

        if let Some(app_name) = self.app_name {
            options.app_name = Some(app_name);
        }
        if let Some(timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
        }

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| StoreError::ConnectionFailure(e.to_string()))?,
            self.database,
        ))
    }
}
