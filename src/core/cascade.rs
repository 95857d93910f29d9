//! Cascade deletes for records that recipes point at.
//!
//! Dependent recipes are removed before the record they reference, and the
//! record itself is only removed once every dependent deletion has come back.
//! There is no rollback: recipes already deleted stay deleted when a sibling
//! deletion fails, but the referenced record is kept so no recipe is left
//! pointing at nothing.

use crate::core::records::fetch_all;
use crate::domain::model::{Collection, Entity, Recipe, RecordId};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{BookError, Result};
use futures::future::join_all;
use std::sync::Arc;

/// Ids of the recipes that must go when `id` is removed from `collection`.
pub fn dependent_recipes(recipes: &[Recipe], collection: Collection, id: &RecordId) -> Vec<RecordId> {
    recipes
        .iter()
        .filter(|recipe| match collection {
            Collection::Authors => &recipe.author == id,
            Collection::Ingredients => recipe.uses_ingredient(id),
            // recipes are leaves; nothing references them
            Collection::Recipes => false,
        })
        .map(|recipe| recipe.id.clone())
        .collect()
}

pub struct CascadeResolver<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> CascadeResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Removes `id` from `T`'s collection after its dependent recipes, and
    /// returns the removed record as it was before deletion.
    pub async fn remove<T: Entity>(&self, id: &RecordId) -> Result<T> {
        let collection = T::COLLECTION;
        if collection != Collection::Recipes {
            let recipes = fetch_all::<Recipe, S>(&self.store).await?;
            let dependents = dependent_recipes(&recipes, collection, id);
            self.remove_dependents(collection, id, &dependents).await?;
        }

        let removed = self
            .store
            .delete_by_id(collection, id)
            .await?
            .ok_or_else(|| BookError::NotFound {
                collection,
                id: id.clone(),
            })?;
        tracing::info!(%collection, %id, "record removed");
        T::from_document(removed)
    }

    async fn remove_dependents(
        &self,
        collection: Collection,
        id: &RecordId,
        dependents: &[RecordId],
    ) -> Result<()> {
        if dependents.is_empty() {
            return Ok(());
        }

        let deletions = dependents
            .iter()
            .map(|recipe_id| self.store.delete_by_id(Collection::Recipes, recipe_id));
        let outcomes = join_all(deletions).await;

        let mut failures = Vec::new();
        for (recipe_id, outcome) in dependents.iter().zip(outcomes) {
            match outcome {
                Ok(Some(_)) => {}
                Ok(None) => {
                    // removed by someone else in the meantime; the goal is met
                    tracing::warn!(%recipe_id, "dependent recipe already gone");
                }
                Err(e) => failures.push(format!("{recipe_id}: {e}")),
            }
        }

        if failures.is_empty() {
            tracing::info!(%collection, %id, removed = dependents.len(), "dependent recipes removed");
            return Ok(());
        }

        let err = BookError::CascadeFailure {
            collection,
            id: id.clone(),
            failed: failures.len(),
            total: dependents.len(),
            reason: failures.join("; "),
        };
        tracing::error!(error = %err, "cascade aborted");
        Err(err)
    }
}
