//! Builds a MongoDB-backed repository from configuration.

use tracing::{error, info};

use northwind_core::{backend::StoreBackendBuilder, error::StoreResult, store::DocumentStore};
use northwind_mongodb::MongoDbStore;

use crate::{config::StoreConfig, repository::ProductRepository};

/// Creates the repository for the configured database and checks the server.
///
/// An unreachable server does not fail startup: the failed ping is logged and
/// the repository is returned, so later operations fail individually with
/// [`StoreError::ConnectionFailure`](northwind_core::error::StoreError::ConnectionFailure)
/// until the server comes back.
///
/// ## Returns
/// * `Err(StoreError::ConnectionFailure)` - the connection string can't be parsed
pub async fn connect(config: &StoreConfig) -> StoreResult<ProductRepository<MongoDbStore>> {
    let backend = MongoDbStore::builder(&config.uri, &config.database)
        .app_name(config.app_name.clone())
        .server_selection_timeout(config.server_selection_timeout)
        .build()
        .await?;

    let repository = ProductRepository::new(DocumentStore::new(backend));

    match repository.store().ping().await {
        Ok(()) => info!(database = %config.database, "Connected to MongoDB"),
        Err(err) => error!(
            database = %config.database,
            error = %err,
            "MongoDB is unreachable, operations will fail until it responds"
        ),
    }

    Ok(repository)
}
