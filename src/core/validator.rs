//! Integrity checks run against a collection snapshot before a write.
//!
//! Every function here is pure: callers fetch the snapshot immediately before
//! checking and pass it in. Nothing stops another writer from changing the
//! collection between the check and the write.

use crate::domain::model::{Author, Collection, Entity, Ingredient, Recipe, RecordId};
use crate::utils::error::{BookError, Result};

/// Fails with `DuplicateValue` if a record other than `except` already has
/// `value` in `field`.
pub fn check_unique<T: Entity>(
    existing: &[T],
    field: &str,
    value: &str,
    except: Option<&RecordId>,
) -> Result<()> {
    let taken = existing
        .iter()
        .filter(|record| Some(record.id()) != except)
        .any(|record| record.field(field) == Some(value));

    if taken {
        tracing::warn!(collection = %T::COLLECTION, field, value, "uniqueness check failed");
        return Err(BookError::DuplicateValue {
            collection: T::COLLECTION,
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Fails with `NotFound` if no record in `existing` has `id`.
pub fn check_exists<'a, T: Entity>(existing: &'a [T], id: &RecordId) -> Result<&'a T> {
    existing
        .iter()
        .find(|record| record.id() == id)
        .ok_or_else(|| {
            tracing::warn!(collection = %T::COLLECTION, %id, "existence check failed");
            BookError::NotFound {
                collection: T::COLLECTION,
                id: id.clone(),
            }
        })
}

/// A stored reference from one record to another.
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
    pub from: Collection,
    pub owner: &'a RecordId,
    pub field: &'static str,
    pub target: &'a RecordId,
}

impl Reference<'_> {
    pub fn dangling(&self) -> BookError {
        BookError::DanglingReference {
            collection: self.from,
            id: self.owner.clone(),
            field: self.field.to_string(),
            target: self.target.clone(),
        }
    }
}

/// Fails with `DanglingReference` if the reference target is not in `collection`.
pub fn check_reference_exists<T: Entity>(collection: &[T], reference: Reference<'_>) -> Result<()> {
    if collection.iter().any(|record| record.id() == reference.target) {
        Ok(())
    } else {
        Err(reference.dangling())
    }
}

/// Lists every dangling reference held by `recipes`, in recipe order.
pub fn audit_references(
    recipes: &[Recipe],
    authors: &[Author],
    ingredients: &[Ingredient],
) -> Vec<BookError> {
    let mut violations = Vec::new();
    for recipe in recipes {
        let author = Reference {
            from: Collection::Recipes,
            owner: &recipe.id,
            field: "author",
            target: &recipe.author,
        };
        if let Err(e) = check_reference_exists(authors, author) {
            violations.push(e);
        }
        for ingredient_id in &recipe.ingredients {
            let ingredient = Reference {
                from: Collection::Recipes,
                owner: &recipe.id,
                field: "ingredients",
                target: ingredient_id,
            };
            if let Err(e) = check_reference_exists(ingredients, ingredient) {
                violations.push(e);
            }
        }
    }
    violations
}
