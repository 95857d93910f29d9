pub mod book;
pub mod cascade;
pub mod mutations;
pub mod queries;
pub mod records;
pub mod relations;
pub mod validator;

pub use crate::domain::model::{
    Author, AuthorView, Collection, Document, Entity, Ingredient, IngredientView, Recipe,
    RecipeView, RecordId,
};
pub use crate::domain::ports::{DocumentStore, Storage};
pub use crate::utils::error::Result;
