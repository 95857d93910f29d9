pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{open_store, InMemoryStore, LocalStorage, SnapshotStore};
pub use config::TomlConfig;
pub use core::{
    book::RecipeBook,
    cascade::CascadeResolver,
    mutations::MutationOrchestrator,
    queries::{QueryService, RecipeFilter},
    relations::{EntityRef, Related, RelationshipResolver},
};
pub use domain::model::{
    Author, AuthorView, Collection, Document, Entity, Ingredient, IngredientView, Recipe,
    RecipeView, RecordId,
};
pub use domain::ports::{DocumentStore, Storage};
pub use utils::error::{BookError, Result};
