//! Generic async file-based tenant store.
//!
//! [`FileStore`] implements [`ConfigStore`] for any file format by
//! accepting a deserialization function at construction time. The file
//! maps public hostnames to tenant documents. It is re-read on every
//! lookup so tenants added to the file are picked up by the next
//! request for that hostname; resolved tenants are cached upstream by
//! the resolver, so this only happens on cache misses.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{DeserializeFn, StoreFile};
use crate::config::model::normalize_hostname;
use crate::config::ConfigStore;
use crate::error::GatewayError;

pub struct FileStore {
    path: PathBuf,
    name: &'static str,
    deserialize: DeserializeFn,
}

impl FileStore {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: DeserializeFn) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_store(&self) -> Result<StoreFile, GatewayError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GatewayError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                GatewayError::Io(e)
            }
        })?;

        (self.deserialize)(&content).map_err(|e| GatewayError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn get(&self, hostname: &str) -> Result<Option<String>, GatewayError> {
        let store = self.read_store().await?;

        let Some(document) = store
            .iter()
            .find(|(host, _)| normalize_hostname(host) == hostname)
            .map(|(_, doc)| doc)
        else {
            return Ok(None);
        };

        serde_json::to_string(document)
            .map(Some)
            .map_err(|e| GatewayError::Store {
                backend: self.name,
                source: Box::new(e),
            })
    }
}
