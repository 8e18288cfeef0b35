//! Database connection module for `ClickHouse`.
//!
//! This module builds the `ClickHouse` client the collected rows are written
//! through, from environment variables with defaults.

use anyhow::{Context, Result};
use clickhouse::Client;
use std::sync::Arc;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host name.
    pub host: String,
    /// HTTP port of the database.
    pub port: u16,
    /// Username for authentication
    pub user: String,
    /// Password for authentication
    pub password: String,
    /// Database name to use
    pub database: String,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DB_HOST`: Database host (default: "localhost")
    /// - `DB_PORT`: Database HTTP port (default: 8123)
    /// - `DB_USER`: Database user (default: "default")
    /// - `DB_PASSWORD`: Database password (default: empty)
    /// - `DB_NAME`: Database name (default: "crux")
    ///
    /// # Errors
    ///
    /// Returns an error if `DB_PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load database configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `DB_PORT` is set but is not a valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = var("DB_PORT")
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("DB_PORT is not a valid port number")?
            .unwrap_or(8123);

        Ok(Self {
            host: var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            user: var("DB_USER").unwrap_or_else(|| "default".to_string()),
            password: var("DB_PASSWORD").unwrap_or_default(),
            database: var("DB_NAME").unwrap_or_else(|| "crux".to_string()),
        })
    }

    /// Returns the HTTP URL of the database server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8123,
            user: "default".to_string(),
            password: String::new(),
            database: "crux".to_string(),
        }
    }
}

/// Database client wrapper.
#[derive(Clone)]
pub struct Database {
    client: Arc<Client>,
}

impl Database {
    /// Create a new database client from configuration.
    ///
    /// No connection is made until the first query.
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        let client = Client::default()
            .with_url(config.url())
            .with_database(&config.database)
            .with_user(&config.user)
            .with_password(&config.password);

        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying `ClickHouse` client.
    #[must_use]
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }

    /// Test database connectivity by executing a simple query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or the query fails.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .query("SELECT 1")
            .fetch_one::<u8>()
            .await
            .context("Failed to ping database")?;
        Ok(())
    }
}
