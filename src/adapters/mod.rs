// Adapters layer: concrete implementations of the domain ports.

pub mod local;
pub mod memory;
pub mod snapshot;

pub use local::LocalStorage;
pub use memory::InMemoryStore;
pub use snapshot::SnapshotStore;

use crate::config::StoreConfig;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{BookError, Result};
use std::sync::Arc;

/// Builds the document store selected by `config.backend`.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        "file" => {
            let storage = LocalStorage::new(&config.data_dir);
            let store = SnapshotStore::open(storage, config.file_name.clone()).await?;
            tracing::info!(path = %config.snapshot_path().display(), "using snapshot store");
            Ok(Arc::new(store))
        }
        other => Err(BookError::InvalidConfigValueError {
            field: "store.backend".to_string(),
            value: other.to_string(),
            reason: "Expected one of: memory, file".to_string(),
        }),
    }
}
