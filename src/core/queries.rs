use crate::core::records::{fetch_all, fetch_by_id};
use crate::core::relations::RelationshipResolver;
use crate::core::validator::audit_references;
use crate::domain::model::{
    Author, AuthorView, Entity, Ingredient, IngredientView, Recipe, RecipeView, RecordId,
};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{BookError, Result};
use futures::future::try_join_all;
use std::sync::Arc;

/// Optional filters of the `recipes` query. Both apply when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<RecordId>,
    pub ingredient: Option<RecordId>,
}

impl RecipeFilter {
    pub fn by_author(id: impl Into<RecordId>) -> Self {
        Self {
            author: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_ingredient(id: impl Into<RecordId>) -> Self {
        Self {
            ingredient: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.author.as_ref().map_or(true, |id| &recipe.author == id)
            && self
                .ingredient
                .as_ref()
                .map_or(true, |id| recipe.uses_ingredient(id))
    }
}

pub struct QueryService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    relations: Arc<RelationshipResolver<S>>,
}

impl<S: DocumentStore + ?Sized> QueryService<S> {
    pub fn new(store: Arc<S>, relations: Arc<RelationshipResolver<S>>) -> Self {
        Self { store, relations }
    }

    pub async fn recipes(&self, filter: &RecipeFilter) -> Result<Vec<RecipeView>> {
        let recipes = fetch_all::<Recipe, S>(&self.store).await?;
        let matching = recipes
            .into_iter()
            .filter(|recipe| filter.matches(recipe))
            .collect();
        self.relations.recipe_views(matching).await
    }

    pub async fn authors(&self) -> Result<Vec<AuthorView>> {
        let authors = fetch_all::<Author, S>(&self.store).await?;
        try_join_all(authors.into_iter().map(|a| self.relations.author_view(a))).await
    }

    pub async fn ingredients(&self) -> Result<Vec<IngredientView>> {
        let ingredients = fetch_all::<Ingredient, S>(&self.store).await?;
        try_join_all(ingredients.into_iter().map(|i| self.relations.ingredient_view(i))).await
    }

    pub async fn recipe(&self, id: &RecordId) -> Result<RecipeView> {
        let recipe = self.get::<Recipe>(id).await?;
        self.relations.recipe_view(recipe).await
    }

    pub async fn author(&self, id: &RecordId) -> Result<AuthorView> {
        let author = self.get::<Author>(id).await?;
        self.relations.author_view(author).await
    }

    pub async fn ingredient(&self, id: &RecordId) -> Result<IngredientView> {
        let ingredient = self.get::<Ingredient>(id).await?;
        self.relations.ingredient_view(ingredient).await
    }

    /// Fetches one record without resolving its relationships.
    pub async fn get<T: Entity>(&self, id: &RecordId) -> Result<T> {
        fetch_by_id::<T, S>(&self.store, id)
            .await?
            .ok_or_else(|| BookError::NotFound {
                collection: T::COLLECTION,
                id: id.clone(),
            })
    }

    /// Every dangling reference currently stored in recipes.
    pub async fn check_references(&self) -> Result<Vec<BookError>> {
        let (recipes, authors, ingredients) = futures::try_join!(
            fetch_all::<Recipe, S>(&self.store),
            fetch_all::<Author, S>(&self.store),
            fetch_all::<Ingredient, S>(&self.store),
        )?;
        Ok(audit_references(&recipes, &authors, &ingredients))
    }
}
