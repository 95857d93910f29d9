//! Read-time reconstruction of the links between records.
//!
//! Relationships are stored as ids only. Each lookup goes to the store; there
//! is no cache, so every resolution sees the data as it is right now.

use crate::core::records::{fetch_all, fetch_by_id};
use crate::core::validator::Reference;
use crate::domain::model::{
    Author, AuthorView, Collection, Entity, Ingredient, IngredientView, Recipe, RecipeView,
};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{BookError, Result};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;

/// The record whose relationship is being resolved.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Recipe(&'a Recipe),
    Author(&'a Author),
    Ingredient(&'a Ingredient),
}

impl EntityRef<'_> {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Recipe(_) => Collection::Recipes,
            Self::Author(_) => Collection::Authors,
            Self::Ingredient(_) => Collection::Ingredients,
        }
    }
}

/// Result of resolving one relationship field. Recipes come back with
/// their own references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Related {
    Author(Author),
    Ingredients(Vec<Ingredient>),
    Recipes(Vec<RecipeView>),
}

pub struct RelationshipResolver<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> RelationshipResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves `field` on `parent`.
    ///
    /// | parent     | field         | result        |
    /// |------------|---------------|---------------|
    /// | recipe     | `author`      | one author    |
    /// | recipe     | `ingredients` | ingredients   |
    /// | author     | `recipes`     | recipes       |
    /// | ingredient | `recipes`     | recipes       |
    pub async fn resolve(&self, parent: EntityRef<'_>, field: &str) -> Result<Related> {
        match (parent, field) {
            (EntityRef::Recipe(recipe), "author") => self.author_of(recipe).await.map(Related::Author),
            (EntityRef::Recipe(recipe), "ingredients") => {
                self.ingredients_of(recipe).await.map(Related::Ingredients)
            }
            (EntityRef::Author(author), "recipes") => {
                let recipes = self.recipes_of_author(author).await?;
                self.recipe_views(recipes).await.map(Related::Recipes)
            }
            (EntityRef::Ingredient(ingredient), "recipes") => {
                let recipes = self.recipes_of_ingredient(ingredient).await?;
                self.recipe_views(recipes).await.map(Related::Recipes)
            }
            _ => Err(BookError::UnknownRelation {
                collection: parent.collection(),
                field: field.to_string(),
            }),
        }
    }

    /// Fails with `NotFound` for the author id when the author is gone.
    pub async fn author_of(&self, recipe: &Recipe) -> Result<Author> {
        fetch_by_id::<Author, S>(&self.store, &recipe.author)
            .await?
            .ok_or_else(|| {
                tracing::error!(
                    recipe = %recipe.id,
                    author = %recipe.author,
                    "recipe author did not resolve"
                );
                BookError::NotFound {
                    collection: Collection::Authors,
                    id: recipe.author.clone(),
                }
            })
    }

    /// Same length and order as `recipe.ingredients`. Any dangling id fails
    /// the whole resolution.
    pub async fn ingredients_of(&self, recipe: &Recipe) -> Result<Vec<Ingredient>> {
        let lookups = recipe.ingredients.iter().map(|id| async move {
            fetch_by_id::<Ingredient, S>(&self.store, id)
                .await?
                .ok_or_else(|| {
                    let err = Reference {
                        from: Collection::Recipes,
                        owner: &recipe.id,
                        field: "ingredients",
                        target: id,
                    }
                    .dangling();
                    tracing::error!(error = %err, "recipe ingredient did not resolve");
                    err
                })
        });
        try_join_all(lookups).await
    }

    pub async fn recipes_of_author(&self, author: &Author) -> Result<Vec<Recipe>> {
        let recipes = fetch_all::<Recipe, S>(&self.store).await?;
        Ok(recipes.into_iter().filter(|r| &r.author == author.id()).collect())
    }

    pub async fn recipes_of_ingredient(&self, ingredient: &Ingredient) -> Result<Vec<Recipe>> {
        let recipes = fetch_all::<Recipe, S>(&self.store).await?;
        Ok(recipes
            .into_iter()
            .filter(|r| r.uses_ingredient(ingredient.id()))
            .collect())
    }

    pub async fn recipe_view(&self, recipe: Recipe) -> Result<RecipeView> {
        let (author, ingredients) =
            futures::try_join!(self.author_of(&recipe), self.ingredients_of(&recipe))?;
        Ok(RecipeView {
            id: recipe.id,
            title: recipe.title,
            author,
            ingredients,
        })
    }

    /// Resolves every recipe, keeping the input order.
    pub async fn recipe_views(&self, recipes: Vec<Recipe>) -> Result<Vec<RecipeView>> {
        try_join_all(recipes.into_iter().map(|recipe| self.recipe_view(recipe))).await
    }

    pub async fn author_view(&self, author: Author) -> Result<AuthorView> {
        let recipes = self.recipes_of_author(&author).await?;
        let recipes = self.recipe_views(recipes).await?;
        Ok(AuthorView {
            id: author.id,
            name: author.name,
            email: author.email,
            recipes,
        })
    }

    pub async fn ingredient_view(&self, ingredient: Ingredient) -> Result<IngredientView> {
        let recipes = self.recipes_of_ingredient(&ingredient).await?;
        let recipes = self.recipe_views(recipes).await?;
        Ok(IngredientView {
            id: ingredient.id,
            name: ingredient.name,
            recipes,
        })
    }
}
