//! Redis-backed tenant store.
//!
//! [`RedisStore`] implements [`ConfigStore`] by reading the tenant
//! document as a JSON string stored under `{prefix}{hostname}` (default
//! prefix `pagefront:domain:`). It uses a multiplexed Tokio connection.
//! A missing key means the hostname is not configured.

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use crate::config::ConfigStore;
use crate::error::GatewayError;

pub const DEFAULT_PREFIX: &str = "pagefront:domain:";

pub struct RedisStore {
    connection: Mutex<redis::aio::MultiplexedConnection>,
    prefix: String,
}

impl RedisStore {
    pub async fn new(url: &str, prefix: &str) -> Result<Self, GatewayError> {
        let client = redis::Client::open(url).map_err(|e| GatewayError::Store {
            backend: "redis",
            source: Box::new(e),
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| GatewayError::Store {
                backend: "redis",
                source: Box::new(e),
            })?;

        Ok(Self {
            connection: Mutex::new(connection),
            prefix: prefix.to_string(),
        })
    }
}

#[async_trait]
impl ConfigStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    #[allow(clippy::significant_drop_tightening)]
    async fn get(&self, hostname: &str) -> Result<Option<String>, GatewayError> {
        let key = format!("{}{hostname}", self.prefix);
        let mut conn = self.connection.lock().await;

        conn.get(&key).await.map_err(|e| GatewayError::Store {
            backend: "redis",
            source: Box::new(e),
        })
    }
}
