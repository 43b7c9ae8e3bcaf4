//! Single-tenant store.
//!
//! [`StaticStore`] serves one tenant document for every hostname, the
//! way a gateway dedicated to one site is deployed. The document is read
//! once at startup; the resolver still stamps each request hostname as
//! the public domain, and never caches the result since any hostname
//! matches.

use std::path::Path;

use async_trait::async_trait;

use crate::config::model::TenantDocument;
use crate::config::ConfigStore;
use crate::error::GatewayError;

#[derive(Debug, Clone)]
pub struct StaticStore {
    document: String,
}

impl StaticStore {
    /// Wrap an already-serialized JSON tenant document.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Load a single tenant document from a JSON file, failing early if
    /// it does not parse.
    pub async fn from_file(path: &Path) -> Result<Self, GatewayError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GatewayError::ConfigFileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GatewayError::Io(e)
            }
        })?;

        TenantDocument::from_json(&content).map_err(|e| GatewayError::ConfigParse {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(Self::new(content))
    }
}

#[async_trait]
impl ConfigStore for StaticStore {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn get(&self, _hostname: &str) -> Result<Option<String>, GatewayError> {
        Ok(Some(self.document.clone()))
    }

    fn cacheable(&self) -> bool {
        false
    }
}
