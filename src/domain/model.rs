use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{BookError, Result};

/// A stored document. The store keeps the identifier under [`ID_FIELD`].
pub type Document = serde_json::Map<String, serde_json::Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Recipes,
    Authors,
    Ingredients,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Recipes, Self::Authors, Self::Ingredients];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recipes => "recipes",
            Self::Authors => "authors",
            Self::Ingredients => "ingredients",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical record identifier. Ids are compared as strings everywhere,
/// whatever representation the backing store uses internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A record kind living in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &RecordId;

    /// String-valued field lookup used by uniqueness checks.
    fn field(&self, name: &str) -> Option<&str>;

    fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(document))?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

impl Entity for Author {
    const COLLECTION: Collection = Collection::Authors;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
}

impl Entity for Ingredient {
    const COLLECTION: Collection = Collection::Ingredients;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: String,
    pub author: RecordId,
    /// Duplicates are allowed; order is preserved.
    #[serde(default)]
    pub ingredients: Vec<RecordId>,
}

impl Recipe {
    pub fn uses_ingredient(&self, id: &RecordId) -> bool {
        self.ingredients.contains(id)
    }
}

impl Entity for Recipe {
    const COLLECTION: Collection = Collection::Recipes;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "author" => Some(self.author.as_str()),
            _ => None,
        }
    }
}

/// Field sets written on insert/update; the store owns `_id`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorFields {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientFields {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeFields {
    pub title: String,
    pub author: RecordId,
    pub ingredients: Vec<RecordId>,
}

pub fn to_document<T: Serialize>(fields: &T) -> Result<Document> {
    match serde_json::to_value(fields)? {
        serde_json::Value::Object(document) => Ok(document),
        other => Err(BookError::store(format!(
            "expected a JSON object for a document, got {other}"
        ))),
    }
}

/// Reads the identifier of a stored document.
pub fn document_id(document: &Document) -> Option<RecordId> {
    document
        .get(ID_FIELD)
        .and_then(|value| value.as_str())
        .map(RecordId::from)
}

/// A recipe with its references resolved, as handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeView {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: String,
    pub author: Author,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientView {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub recipes: Vec<RecipeView>,
}
