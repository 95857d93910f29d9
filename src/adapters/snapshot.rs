use crate::adapters::memory::{Collections, InMemoryStore};
use crate::domain::model::{Collection, Document, RecordId};
use crate::domain::ports::{DocumentStore, Storage};
use crate::utils::error::{BookError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::sync::Mutex;

/// Document store kept in memory and written back as a single JSON file
/// through a [`Storage`] after every successful write.
///
/// A write only stands once the file is written. When persisting fails the
/// in-memory content is put back as it was and the storage error returned.
pub struct SnapshotStore<S: Storage> {
    storage: S,
    file_name: String,
    inner: InMemoryStore,
    write_lock: Mutex<()>,
}

impl<S: Storage> SnapshotStore<S> {
    /// Loads `file_name` from `storage`. A missing file opens an empty book.
    pub async fn open(storage: S, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        let collections = match storage.read_file(&file_name).await {
            Ok(bytes) => serde_json::from_slice::<Collections>(&bytes)?,
            Err(BookError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(file = %file_name, "no snapshot found, starting an empty recipe book");
                Collections::new()
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(
            file = %file_name,
            recipes = collections.get(&Collection::Recipes).map_or(0, Vec::len),
            authors = collections.get(&Collection::Authors).map_or(0, Vec::len),
            ingredients = collections.get(&Collection::Ingredients).map_or(0, Vec::len),
            "snapshot loaded"
        );

        Ok(Self {
            storage,
            file_name,
            inner: InMemoryStore::from_collections(collections),
            write_lock: Mutex::new(()),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Writes the current content, or restores `before` if that fails.
    /// Callers hold `write_lock` from taking `before` until this returns.
    async fn commit(&self, before: Collections) -> Result<()> {
        let collections = self.inner.snapshot().await;
        let written = match serde_json::to_vec_pretty(&collections) {
            Ok(data) => self
                .storage
                .write_file(&self.file_name, &data)
                .await
                .map(|()| data.len()),
            Err(e) => Err(e.into()),
        };

        match written {
            Ok(bytes) => {
                tracing::debug!(file = %self.file_name, bytes, "snapshot written");
                Ok(())
            }
            Err(e) => {
                self.inner.restore(before).await;
                tracing::error!(
                    file = %self.file_name,
                    error = %e,
                    "snapshot write failed, change rolled back"
                );
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<S: Storage> DocumentStore for SnapshotStore<S> {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>> {
        self.inner.find_all(collection).await
    }

    async fn find_by_id(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>> {
        self.inner.find_by_id(collection, id).await
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<Document> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot().await;
        let inserted = self.inner.insert(collection, document).await?;
        self.commit(before).await?;
        Ok(inserted)
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<Document>> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot().await;
        let removed = self.inner.delete_by_id(collection, id).await?;
        if removed.is_some() {
            self.commit(before).await?;
        }
        Ok(removed)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Document,
    ) -> Result<Option<Document>> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot().await;
        let updated = self.inner.update_by_id(collection, id, fields).await?;
        if updated.is_some() {
            self.commit(before).await?;
        }
        Ok(updated)
    }
}
