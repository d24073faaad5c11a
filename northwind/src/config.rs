//! Store connection configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults
//! that point at a local MongoDB holding the `Northwind` database.

use std::{env, time::Duration};
use thiserror::Error;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "Northwind";
pub const DEFAULT_APP_NAME: &str = "northwind";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the document store.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("mongodb://db.internal:27017", "Northwind")
///     .server_selection_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// MongoDB connection string.
    pub uri: String,

    /// Database holding the `categories` and `products` collections.
    pub database: String,

    /// Application name reported to the server.
    pub app_name: String,

    /// How long an operation waits for a usable server before failing.
    pub server_selection_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URI, DEFAULT_DATABASE)
    }
}

impl StoreConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        StoreConfig {
            uri: uri.into(),
            database: database.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
        }
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `NORTHWIND_MONGODB_URI` | `mongodb://localhost:27017` |
    /// | `NORTHWIND_DATABASE` | `Northwind` |
    /// | `NORTHWIND_APP_NAME` | `northwind` |
    /// | `NORTHWIND_SERVER_SELECTION_TIMEOUT_SECS` | `30` |
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = StoreConfig::new(
            lookup("NORTHWIND_MONGODB_URI").unwrap_or_else(|| DEFAULT_URI.to_string()),
            lookup("NORTHWIND_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        );

        if let Some(app_name) = lookup("NORTHWIND_APP_NAME") {
            config.app_name = app_name;
        }

        if let Some(secs) = lookup("NORTHWIND_SERVER_SELECTION_TIMEOUT_SECS") {
            config.server_selection_timeout = secs
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue("NORTHWIND_SERVER_SELECTION_TIMEOUT_SECS".to_string()))?;
        }

        if config.database.is_empty() {
            return Err(ConfigError::InvalidValue("NORTHWIND_DATABASE".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
