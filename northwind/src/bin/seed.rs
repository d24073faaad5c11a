//! # Seed Data
//!
//! Adds the Beverages category and the Chai product to the configured
//! database, then prints the populated product list.
//!
//! ## Usage
//! ```bash
//! # Local Northwind database
//! cargo run -p northwind --features mongodb --bin seed
//!
//! # Another server
//! NORTHWIND_MONGODB_URI=mongodb://db.internal:27017 cargo run -p northwind --features mongodb --bin seed
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use tracing::info;
use tracing_subscriber::EnvFilter;

use northwind::{
    config::StoreConfig,
    models::{Category, Product},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = StoreConfig::load()?.app_name("northwind-seed");
    info!(database = %config.database, "Configuration loaded");

    let repo = northwind::connect(&config).await?;

    let beverages = repo
        .add_category(Category::new(
            "Beverages",
            "Soft drinks, coffees, teas, beers, and ales",
        ))
        .await?;
    let category_id = beverages
        .id
        .ok_or("category was stored without an id")?;

    let chai = repo
        .add(Product::new("Chai", 18.0, 39).in_category(category_id))
        .await?;
    info!(id = ?chai.id, "Seeded Chai");

    let products = repo.list_all().await?;
    info!(count = products.len(), "Listed products");
    println!("{}", serde_json::to_string_pretty(&products)?);

    repo.into_store().shutdown().await?;

    Ok(())
}
