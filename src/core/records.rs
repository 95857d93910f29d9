//! Typed access to the document store.

use crate::domain::model::{Entity, RecordId};
use crate::domain::ports::DocumentStore;
use crate::utils::error::Result;

/// Fetches the full current content of `T`'s collection.
pub async fn fetch_all<T: Entity, S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<T>> {
    let documents = store.find_all(T::COLLECTION).await?;
    tracing::debug!(collection = %T::COLLECTION, count = documents.len(), "snapshot fetched");
    documents.into_iter().map(T::from_document).collect()
}

pub async fn fetch_by_id<T: Entity, S: DocumentStore + ?Sized>(
    store: &S,
    id: &RecordId,
) -> Result<Option<T>> {
    store
        .find_by_id(T::COLLECTION, id)
        .await?
        .map(T::from_document)
        .transpose()
}
