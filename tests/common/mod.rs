#![allow(dead_code)]

use async_trait::async_trait;
use recipe_book::{
    Author, BookError, Collection, Document, DocumentStore, InMemoryStore, Ingredient, Recipe,
    RecipeBook, RecordId, Result,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub fn book() -> (Arc<InMemoryStore>, RecipeBook<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let book = RecipeBook::new(Arc::clone(&store));
    (store, book)
}

pub async fn count<S: DocumentStore + ?Sized>(store: &S, collection: Collection) -> usize {
    store.find_all(collection).await.unwrap().len()
}

pub async fn add_author<S: DocumentStore + ?Sized>(book: &RecipeBook<S>, name: &str) -> Author {
    book.mutations()
        .add_author(name, &format!("{}@x.io", name.to_lowercase()))
        .await
        .unwrap()
}

pub async fn add_ingredient<S: DocumentStore + ?Sized>(
    book: &RecipeBook<S>,
    name: &str,
) -> Ingredient {
    book.mutations().add_ingredient(name).await.unwrap()
}

pub async fn add_recipe<S: DocumentStore + ?Sized>(
    book: &RecipeBook<S>,
    title: &str,
    author: &Author,
    ingredients: &[&Ingredient],
) -> Recipe {
    let ids: Vec<RecordId> = ingredients.iter().map(|i| i.id.clone()).collect();
    book.mutations()
        .add_recipe(title, &author.id, &ids)
        .await
        .unwrap()
}

/// Store that refuses to delete selected records.
#[derive(Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    undeletable: Mutex<HashSet<RecordId>>,
}

impl FailingStore {
    pub fn refuse_delete(&self, id: &RecordId) {
        self.undeletable.lock().unwrap().insert(id.clone());
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>> {
        self.inner.find_all(collection).await
    }

    async fn find_by_id(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>> {
        self.inner.find_by_id(collection, id).await
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<Document> {
        self.inner.insert(collection, document).await
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<Document>> {
        let refused = self.undeletable.lock().unwrap().contains(id);
        if refused {
            return Err(BookError::store(format!("delete of {id} refused")));
        }
        self.inner.delete_by_id(collection, id).await
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Document,
    ) -> Result<Option<Document>> {
        self.inner.update_by_id(collection, id, fields).await
    }
}
