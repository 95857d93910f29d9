mod common;

use common::{add_author, add_ingredient, add_recipe, book};
use recipe_book::{BookError, Collection, DocumentStore, EntityRef, RecipeFilter, Related};

#[tokio::test]
async fn test_bread_by_ada_then_ada_leaves() {
    let (_store, book) = book();

    let ada = book.mutations().add_author("Ada", "a@x.io").await.unwrap();
    let flour = book.mutations().add_ingredient("Flour").await.unwrap();
    book.mutations()
        .add_recipe("Bread", &ada.id, &[flour.id.clone()])
        .await
        .unwrap();

    let by_ada = book
        .queries()
        .recipes(&RecipeFilter::by_author(ada.id.clone()))
        .await
        .unwrap();
    assert_eq!(by_ada.len(), 1);
    assert_eq!(by_ada[0].title, "Bread");
    assert_eq!(by_ada[0].author.name, "Ada");
    assert_eq!(by_ada[0].ingredients[0].name, "Flour");

    book.mutations().remove_author(&ada.id).await.unwrap();
    assert!(book
        .queries()
        .recipes(&RecipeFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_recipe_view_keeps_ingredient_order_and_duplicates() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let flour = add_ingredient(&book, "Flour").await;
    let water = add_ingredient(&book, "Water").await;
    add_recipe(&book, "Dough", &ada, &[&water, &flour, &water]).await;

    let recipes = book.queries().recipes(&RecipeFilter::default()).await.unwrap();
    let names: Vec<_> = recipes[0]
        .ingredients
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, vec!["Water", "Flour", "Water"]);
}

#[tokio::test]
async fn test_recipe_filters_combine() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let bob = add_author(&book, "Bob").await;
    let flour = add_ingredient(&book, "Flour").await;
    let sugar = add_ingredient(&book, "Sugar").await;
    add_recipe(&book, "Bread", &ada, &[&flour]).await;
    add_recipe(&book, "Cake", &ada, &[&flour, &sugar]).await;
    add_recipe(&book, "Fudge", &bob, &[&sugar]).await;

    let titles = |views: Vec<recipe_book::RecipeView>| {
        views.into_iter().map(|v| v.title).collect::<Vec<_>>()
    };

    let with_sugar = book
        .queries()
        .recipes(&RecipeFilter::by_ingredient(sugar.id.clone()))
        .await
        .unwrap();
    assert_eq!(titles(with_sugar), vec!["Cake", "Fudge"]);

    let ada_with_sugar = book
        .queries()
        .recipes(&RecipeFilter {
            author: Some(ada.id.clone()),
            ingredient: Some(sugar.id.clone()),
        })
        .await
        .unwrap();
    assert_eq!(titles(ada_with_sugar), vec!["Cake"]);
}

#[tokio::test]
async fn test_authors_and_ingredients_list_their_recipes() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    add_author(&book, "Bob").await;
    let flour = add_ingredient(&book, "Flour").await;
    add_ingredient(&book, "Sugar").await;
    add_recipe(&book, "Bread", &ada, &[&flour]).await;

    let authors = book.queries().authors().await.unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].recipes.len(), 1);
    assert_eq!(authors[0].recipes[0].title, "Bread");
    assert!(authors[1].recipes.is_empty());

    let ingredients = book.queries().ingredients().await.unwrap();
    assert_eq!(ingredients[0].name, "Flour");
    assert_eq!(ingredients[0].recipes.len(), 1);
    assert!(ingredients[1].recipes.is_empty());

    let ada_view = book.queries().author(&ada.id).await.unwrap();
    assert_eq!(ada_view.email, "ada@x.io");
}

#[tokio::test]
async fn test_relationship_fields_resolve_by_name() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let flour = add_ingredient(&book, "Flour").await;
    let bread = add_recipe(&book, "Bread", &ada, &[&flour]).await;
    let bread_view = book.queries().recipe(&bread.id).await.unwrap();
    let relations = book.relations();

    match relations.resolve(EntityRef::Recipe(&bread), "author").await.unwrap() {
        Related::Author(author) => assert_eq!(author, ada),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        relations
            .resolve(EntityRef::Recipe(&bread), "ingredients")
            .await
            .unwrap(),
        Related::Ingredients(vec![flour.clone()])
    );
    assert_eq!(
        relations
            .resolve(EntityRef::Author(&ada), "recipes")
            .await
            .unwrap(),
        Related::Recipes(vec![bread_view.clone()])
    );
    assert_eq!(
        relations
            .resolve(EntityRef::Ingredient(&flour), "recipes")
            .await
            .unwrap(),
        Related::Recipes(vec![bread_view])
    );

    let err = relations
        .resolve(EntityRef::Author(&ada), "ingredients")
        .await
        .unwrap_err();
    assert!(matches!(err, BookError::UnknownRelation { .. }));
}

#[tokio::test]
async fn test_recipe_lookup_by_id() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let bread = add_recipe(&book, "Bread", &ada, &[]).await;

    let view = book.queries().recipe(&bread.id).await.unwrap();
    assert_eq!(view.author.id, ada.id);
    assert!(view.ingredients.is_empty());

    book.mutations().remove_recipe(&bread.id).await.unwrap();
    assert!(matches!(
        book.queries().recipe(&bread.id).await,
        Err(BookError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_recipe_view_serializes_resolved_references() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let flour = add_ingredient(&book, "Flour").await;
    add_recipe(&book, "Bread", &ada, &[&flour]).await;

    let views = book.queries().recipes(&RecipeFilter::default()).await.unwrap();
    let json = serde_json::to_value(&views[0]).unwrap();
    assert_eq!(json["author"]["name"], "Ada");
    assert_eq!(json["author"]["_id"], ada.id.as_str());
    assert_eq!(json["ingredients"][0]["name"], "Flour");
    assert!(json["_id"].is_string());
}

#[tokio::test]
async fn test_recipes_nested_in_authors_and_ingredients_are_resolved() {
    let (_store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let flour = add_ingredient(&book, "Flour").await;
    add_recipe(&book, "Bread", &ada, &[&flour]).await;

    let authors = book.queries().authors().await.unwrap();
    let json = serde_json::to_value(&authors[0]).unwrap();
    assert_eq!(json["recipes"][0]["title"], "Bread");
    assert_eq!(json["recipes"][0]["author"]["name"], "Ada");
    assert_eq!(json["recipes"][0]["ingredients"][0]["name"], "Flour");

    let ingredients = book.queries().ingredients().await.unwrap();
    let json = serde_json::to_value(&ingredients[0]).unwrap();
    assert_eq!(json["recipes"][0]["author"]["email"], "ada@x.io");
    assert_eq!(json["recipes"][0]["ingredients"][0]["_id"], flour.id.as_str());
}

#[tokio::test]
async fn test_missing_author_of_a_stored_recipe_is_not_found() {
    let (store, book) = book();
    let ada = add_author(&book, "Ada").await;
    let bread = add_recipe(&book, "Bread", &ada, &[]).await;
    // bypass the cascade to leave the recipe pointing at nothing
    store.delete_by_id(Collection::Authors, &ada.id).await.unwrap();

    let err = book.relations().author_of(&bread).await.unwrap_err();
    assert!(matches!(
        err,
        BookError::NotFound { collection: Collection::Authors, ref id } if *id == ada.id
    ));
    assert_eq!(book.queries().check_references().await.unwrap().len(), 1);
}
