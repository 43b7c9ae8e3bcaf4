//! TOML tenant store backed by [`FileStore`].
//!
//! Hostnames contain dots, so tables must be quoted:
//! `["example.com".slugToPage]`.

use std::path::PathBuf;

use super::file_source::FileStore;
use super::StoreFile;

#[must_use]
pub fn new(path: PathBuf) -> FileStore {
    FileStore::new(path, "toml", |content| {
        toml::from_str::<StoreFile>(content)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    })
}
