//! Write operations: validate against fresh snapshots, then apply.
//!
//! Checks run in a fixed order (existence first, then each field in
//! declaration order) and the first violation is returned. No write happens
//! unless every check passed.

use crate::core::cascade::CascadeResolver;
use crate::core::records::fetch_all;
use crate::core::validator::{check_exists, check_unique};
use crate::domain::model::{
    to_document, Author, AuthorFields, Entity, Ingredient, IngredientFields, Recipe, RecipeFields,
    RecordId,
};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{BookError, Result};
use serde::Serialize;
use std::sync::Arc;

pub struct MutationOrchestrator<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    cascade: CascadeResolver<S>,
}

impl<S: DocumentStore + ?Sized> MutationOrchestrator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            cascade: CascadeResolver::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn add_author(&self, name: &str, email: &str) -> Result<Author> {
        let authors = fetch_all::<Author, S>(&self.store).await?;
        check_unique(&authors, "name", name, None)?;
        check_unique(&authors, "email", email, None)?;

        self.insert(&AuthorFields {
            name: name.to_string(),
            email: email.to_string(),
        })
        .await
    }

    pub async fn add_ingredient(&self, name: &str) -> Result<Ingredient> {
        let ingredients = fetch_all::<Ingredient, S>(&self.store).await?;
        check_unique(&ingredients, "name", name, None)?;

        self.insert(&IngredientFields {
            name: name.to_string(),
        })
        .await
    }

    pub async fn add_recipe(
        &self,
        title: &str,
        author: &RecordId,
        ingredients: &[RecordId],
    ) -> Result<Recipe> {
        let (recipes, authors, known_ingredients) = futures::try_join!(
            fetch_all::<Recipe, S>(&self.store),
            fetch_all::<Author, S>(&self.store),
            fetch_all::<Ingredient, S>(&self.store),
        )?;

        check_unique(&recipes, "title", title, None)?;
        check_exists(&authors, author)?;
        for ingredient in ingredients {
            check_exists(&known_ingredients, ingredient)?;
        }

        self.insert(&RecipeFields {
            title: title.to_string(),
            author: author.clone(),
            ingredients: ingredients.to_vec(),
        })
        .await
    }

    pub async fn update_author(&self, id: &RecordId, name: &str, email: &str) -> Result<Author> {
        let authors = fetch_all::<Author, S>(&self.store).await?;
        check_exists(&authors, id)?;
        check_unique(&authors, "name", name, Some(id))?;
        check_unique(&authors, "email", email, Some(id))?;

        self.update(
            id,
            &AuthorFields {
                name: name.to_string(),
                email: email.to_string(),
            },
        )
        .await
    }

    pub async fn update_ingredient(&self, id: &RecordId, name: &str) -> Result<Ingredient> {
        let ingredients = fetch_all::<Ingredient, S>(&self.store).await?;
        check_exists(&ingredients, id)?;
        check_unique(&ingredients, "name", name, Some(id))?;

        self.update(
            id,
            &IngredientFields {
                name: name.to_string(),
            },
        )
        .await
    }

    pub async fn update_recipe(
        &self,
        id: &RecordId,
        title: &str,
        author: &RecordId,
        ingredients: &[RecordId],
    ) -> Result<Recipe> {
        let (recipes, authors, known_ingredients) = futures::try_join!(
            fetch_all::<Recipe, S>(&self.store),
            fetch_all::<Author, S>(&self.store),
            fetch_all::<Ingredient, S>(&self.store),
        )?;

        check_exists(&recipes, id)?;
        check_unique(&recipes, "title", title, Some(id))?;
        check_exists(&authors, author)?;
        for ingredient in ingredients {
            check_exists(&known_ingredients, ingredient)?;
        }

        self.update(
            id,
            &RecipeFields {
                title: title.to_string(),
                author: author.clone(),
                ingredients: ingredients.to_vec(),
            },
        )
        .await
    }

    /// Removes the author and, first, every recipe they wrote.
    pub async fn remove_author(&self, id: &RecordId) -> Result<Author> {
        self.remove::<Author>(id).await
    }

    /// Removes the ingredient and, first, every recipe that uses it.
    pub async fn remove_ingredient(&self, id: &RecordId) -> Result<Ingredient> {
        self.remove::<Ingredient>(id).await
    }

    pub async fn remove_recipe(&self, id: &RecordId) -> Result<Recipe> {
        self.remove::<Recipe>(id).await
    }

    async fn remove<T: Entity>(&self, id: &RecordId) -> Result<T> {
        let existing = fetch_all::<T, S>(&self.store).await?;
        check_exists(&existing, id)?;
        self.cascade.remove::<T>(id).await
    }

    async fn insert<T: Entity, F: Serialize>(&self, fields: &F) -> Result<T> {
        let document = self.store.insert(T::COLLECTION, to_document(fields)?).await?;
        let record = T::from_document(document)?;
        tracing::info!(collection = %T::COLLECTION, id = %record.id(), "record added");
        Ok(record)
    }

    async fn update<T: Entity, F: Serialize>(&self, id: &RecordId, fields: &F) -> Result<T> {
        let document = self
            .store
            .update_by_id(T::COLLECTION, id, to_document(fields)?)
            .await?
            // deleted between the snapshot and the write
            .ok_or_else(|| BookError::NotFound {
                collection: T::COLLECTION,
                id: id.clone(),
            })?;
        let record = T::from_document(document)?;
        tracing::info!(collection = %T::COLLECTION, %id, "record updated");
        Ok(record)
    }
}
