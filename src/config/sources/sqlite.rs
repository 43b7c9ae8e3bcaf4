//! SQLite-backed [`ConfigStore`] implementation.
//!
//! Stores one JSON tenant document per hostname in a local `SQLite`
//! database. The table `pagefront_domains` is auto-created on first
//! connection.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use crate::config::ConfigStore;
use crate::error::GatewayError;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(path: &Path) -> Result<Self, GatewayError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| GatewayError::Store {
                backend: "sqlite",
                source: Box::new(e),
            })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pagefront_domains (\
                hostname TEXT PRIMARY KEY, \
                config_json TEXT NOT NULL\
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| GatewayError::Store {
            backend: "sqlite",
            source: Box::new(e),
        })?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ConfigStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, hostname: &str) -> Result<Option<String>, GatewayError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT config_json FROM pagefront_domains WHERE hostname = ?")
                .bind(hostname)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| GatewayError::Store {
                    backend: "sqlite",
                    source: Box::new(e),
                })?;

        Ok(row.map(|(json,)| json))
    }
}
