use clap::Parser;
use recipe_book::utils::logger;
use recipe_book::{
    open_store, Author, BookError, CliConfig, Collection, Command, DocumentStore, EntityRef,
    Ingredient, Recipe, RecipeBook, RecipeFilter, RecordId,
};
use serde::Serialize;
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger("info");
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if config.logging.format == "json" {
        logger::init_json_logger(&config.logging.level);
    } else {
        logger::init_cli_logger(&config.logging.level);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let outcome = match open_store(&config.store).await {
        Ok(store) => run(&RecipeBook::new(store), cli.command).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(book: &RecipeBook<dyn DocumentStore>, command: Command) -> recipe_book::Result<Value> {
    let queries = book.queries();
    let mutations = book.mutations();

    match command {
        Command::Recipes { author, ingredient } => {
            let filter = RecipeFilter {
                author: author.map(RecordId::from),
                ingredient: ingredient.map(RecordId::from),
            };
            json(queries.recipes(&filter).await?)
        }
        Command::Authors => json(queries.authors().await?),
        Command::Ingredients => json(queries.ingredients().await?),
        Command::AddAuthor { name, email } => json(mutations.add_author(&name, &email).await?),
        Command::AddIngredient { name } => json(mutations.add_ingredient(&name).await?),
        Command::AddRecipe {
            title,
            author,
            ingredients,
        } => {
            let recipe = mutations
                .add_recipe(&title, &RecordId::from(author), &ids(ingredients))
                .await?;
            json(book.relations().recipe_view(recipe).await?)
        }
        Command::UpdateAuthor { id, name, email } => {
            json(mutations.update_author(&RecordId::from(id), &name, &email).await?)
        }
        Command::UpdateIngredient { id, name } => {
            json(mutations.update_ingredient(&RecordId::from(id), &name).await?)
        }
        Command::UpdateRecipe {
            id,
            title,
            author,
            ingredients,
        } => {
            let recipe = mutations
                .update_recipe(
                    &RecordId::from(id),
                    &title,
                    &RecordId::from(author),
                    &ids(ingredients),
                )
                .await?;
            json(book.relations().recipe_view(recipe).await?)
        }
        Command::RemoveAuthor { id } => json(mutations.remove_author(&RecordId::from(id)).await?),
        Command::RemoveIngredient { id } => {
            json(mutations.remove_ingredient(&RecordId::from(id)).await?)
        }
        Command::RemoveRecipe { id } => {
            // the author and ingredients outlive the recipe, so it still resolves
            let recipe = mutations.remove_recipe(&RecordId::from(id)).await?;
            json(book.relations().recipe_view(recipe).await?)
        }
        Command::Related {
            collection,
            id,
            field,
        } => {
            let id = RecordId::from(id);
            let relations = book.relations();
            let related = match Collection::parse(&collection) {
                Some(Collection::Recipes) => {
                    let recipe = queries.get::<Recipe>(&id).await?;
                    relations.resolve(EntityRef::Recipe(&recipe), &field).await?
                }
                Some(Collection::Authors) => {
                    let author = queries.get::<Author>(&id).await?;
                    relations.resolve(EntityRef::Author(&author), &field).await?
                }
                Some(Collection::Ingredients) => {
                    let ingredient = queries.get::<Ingredient>(&id).await?;
                    relations.resolve(EntityRef::Ingredient(&ingredient), &field).await?
                }
                None => {
                    return Err(BookError::InvalidConfigValueError {
                        field: "collection".to_string(),
                        value: collection,
                        reason: "Expected one of: recipes, authors, ingredients".to_string(),
                    })
                }
            };
            json(related)
        }
        Command::Check => {
            let violations = queries.check_references().await?;
            if violations.is_empty() {
                tracing::info!("All recipe references resolve");
            } else {
                tracing::warn!("Found {} dangling references", violations.len());
            }
            json(
                violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            )
        }
    }
}

fn ids(values: Vec<String>) -> Vec<RecordId> {
    values.into_iter().map(RecordId::from).collect()
}

fn json<T: Serialize>(value: T) -> recipe_book::Result<Value> {
    Ok(serde_json::to_value(value)?)
}
