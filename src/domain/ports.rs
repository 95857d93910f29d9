use crate::domain::model::{Collection, Document, RecordId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Raw byte storage used to persist store snapshots.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Collection-oriented document store. The store assigns ids and is the
/// only source of truth; it enforces no constraints of its own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>>;

    async fn find_by_id(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>>;

    /// Inserts `document` and returns it with its assigned `_id`.
    async fn insert(&self, collection: Collection, document: Document) -> Result<Document>;

    async fn delete_by_id(&self, collection: Collection, id: &RecordId)
        -> Result<Option<Document>>;

    /// Sets the given fields and returns the updated document.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Document,
    ) -> Result<Option<Document>>;
}
