//! Concrete [`ConfigStore`](super::ConfigStore) implementations.
//!
//! Provides the file-based store (YAML, JSON, TOML) gated by feature
//! flags, the single-tenant [`static_source::StaticStore`], database
//! backends (Redis, `SQLite`), and the [`parse_store_str`] helper for
//! format-specific deserialization of store files.

pub mod file_source;
pub mod static_source;

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

#[cfg(feature = "redis")]
pub mod redis_source;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use indexmap::IndexMap;

use crate::error::GatewayError;

/// A store file: public hostname -> tenant document, in file order.
pub type StoreFile = IndexMap<String, serde_json::Value>;

pub type DeserializeFn = fn(&str) -> Result<StoreFile, Box<dyn std::error::Error + Send + Sync>>;

/// Parse a store file string based on file extension.
pub fn parse_store_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<StoreFile, GatewayError> {
    let parsed: Result<StoreFile, Box<dyn std::error::Error + Send + Sync>> = match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(Into::into),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(Into::into),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(Into::into),

        other => return Err(GatewayError::UnsupportedFormat(other.to_string())),
    };

    parsed.map_err(|source| GatewayError::ConfigParse {
        path: path_display.to_string(),
        source,
    })
}
