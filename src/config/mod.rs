//! Tenant configuration lookup, resolution, and caching.
//!
//! Defines the [`ConfigStore`] trait for pluggable per-hostname
//! document stores and the [`ConfigResolver`] that turns stored
//! documents into [`DomainConfig`] values and caches them for the
//! lifetime of the process. Submodules provide the data model,
//! validation logic, and concrete store implementations.

pub mod model;
pub mod sources;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::GatewayError;
use model::{normalize_hostname, DomainConfig, TenantDocument};

// async_trait is required here because ConfigStore is used as Box<dyn ConfigStore>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return the serialized tenant document for `hostname`, or `None`
    /// when the hostname is not configured.
    async fn get(&self, hostname: &str) -> Result<Option<String>, GatewayError>;

    /// Whether resolved tenants may be cached by hostname. A store that
    /// answers every hostname must return `false`, or arbitrary `Host`
    /// values would fill the cache.
    fn cacheable(&self) -> bool {
        true
    }
}

pub struct ConfigResolver {
    store: Box<dyn ConfigStore>,
    default_site: String,
    cache: DashMap<String, Arc<DomainConfig>>,
}

impl ConfigResolver {
    #[must_use]
    pub fn new(store: Box<dyn ConfigStore>, default_site: impl Into<String>) -> Self {
        Self {
            store,
            default_site: default_site.into(),
            cache: DashMap::new(),
        }
    }

    /// Resolve the configuration for a request hostname.
    ///
    /// Misses go to the store; only successful resolutions from a
    /// cacheable store are cached, so an unknown hostname is looked up
    /// again on the next request.
    pub async fn resolve(&self, hostname: &str) -> Result<Arc<DomainConfig>, GatewayError> {
        let domain = normalize_hostname(hostname);

        if let Some(cached) = self.cache.get(&domain) {
            return Ok(Arc::clone(cached.value()));
        }

        let Some(raw) = self.store.get(&domain).await? else {
            return Err(GatewayError::ConfigNotFound { hostname: domain });
        };

        let doc =
            TenantDocument::from_json(&raw).map_err(|e| GatewayError::malformed(&domain, e))?;
        let config = Arc::new(DomainConfig::from_document(&domain, doc, &self.default_site));

        if !self.store.cacheable() {
            return Ok(config);
        }

        tracing::info!(
            domain = %domain,
            store = self.store.name(),
            slugs = config.slugs.len(),
            "tenant configuration loaded"
        );

        // Concurrent misses may both get here; the values are equivalent.
        self.cache.insert(domain, Arc::clone(&config));
        Ok(config)
    }

    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    #[must_use]
    pub fn cached_tenants(&self) -> usize {
        self.cache.len()
    }
}
