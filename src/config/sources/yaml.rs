//! YAML tenant store backed by [`FileStore`].

use std::path::PathBuf;

use super::file_source::FileStore;
use super::StoreFile;

#[must_use]
pub fn new(path: PathBuf) -> FileStore {
    FileStore::new(path, "yaml", |content| {
        serde_yml::from_str::<StoreFile>(content)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    })
}
