use crate::domain::model::{document_id, Collection, Document, RecordId, ID_FIELD};
use crate::domain::ports::DocumentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// All collections, in insertion order per collection.
pub type Collections = BTreeMap<Collection, Vec<Document>>;

/// Process-local document store.
///
/// Ids look like object ids: eight hex digits of the creation second followed
/// by sixteen hex digits of a per-store counter.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
    next_seq: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store over documents that already carry their `_id`.
    pub fn from_collections(collections: Collections) -> Self {
        let seq = collections.values().map(Vec::len).sum::<usize>() as u64;
        Self {
            collections: RwLock::new(collections),
            next_seq: AtomicU64::new(seq),
        }
    }

    /// Copies the current content of every collection.
    pub async fn snapshot(&self) -> Collections {
        let collections = self.collections.read().await;
        Collection::ALL
            .into_iter()
            .map(|c| (c, collections.get(&c).cloned().unwrap_or_default()))
            .collect()
    }

    /// Replaces every collection with `collections`. The id counter keeps
    /// running, so ids handed out before the restore are not reissued.
    pub async fn restore(&self, collections: Collections) {
        *self.collections.write().await = collections;
    }

    fn assign_id(&self, existing: &[Document]) -> RecordId {
        let seconds = Utc::now().timestamp() as u32;
        loop {
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
            let candidate = RecordId::new(format!("{seconds:08x}{seq:016x}"));
            if !existing.iter().any(|doc| has_id(doc, &candidate)) {
                return candidate;
            }
        }
    }
}

fn has_id(document: &Document, id: &RecordId) -> bool {
    document_id(document).as_ref() == Some(id)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    async fn insert(&self, collection: Collection, mut document: Document) -> Result<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        let id = self.assign_id(docs);
        document.insert(ID_FIELD.to_string(), serde_json::Value::String(id.to_string()));
        docs.push(document.clone());
        tracing::debug!(%collection, %id, "document inserted");
        Ok(document)
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|doc| has_id(doc, id))
            .map(|index| docs.remove(index)))
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
        mut fields: Document,
    ) -> Result<Option<Document>> {
        fields.remove(ID_FIELD);
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        else {
            return Ok(None);
        };
        doc.extend(fields);
        Ok(Some(doc.clone()))
    }
}
