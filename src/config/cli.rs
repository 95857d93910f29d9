use super::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "recipe-book")]
#[command(about = "Recipes, authors and ingredients with enforced references")]
pub struct CliConfig {
    /// TOML configuration file; flags below override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// `memory` or `file`
    #[arg(long, global = true)]
    pub store: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Loads the configuration file, if any, applies flag overrides and
    /// validates the result.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.store.data_dir = data_dir.clone();
        }
        if let Some(backend) = &self.store {
            config.store.backend = backend.clone();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List recipes, optionally only those by an author and/or using an ingredient
    Recipes {
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        ingredient: Option<String>,
    },
    /// List authors with their recipes
    Authors,
    /// List ingredients with the recipes using them
    Ingredients,
    AddAuthor {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    AddIngredient {
        #[arg(long)]
        name: String,
    },
    AddRecipe {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Repeat or comma-separate for several ingredients
        #[arg(long = "ingredient", value_delimiter = ',')]
        ingredients: Vec<String>,
    },
    UpdateAuthor {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    UpdateIngredient {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    UpdateRecipe {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long = "ingredient", value_delimiter = ',')]
        ingredients: Vec<String>,
    },
    /// Remove an author and every recipe they wrote
    RemoveAuthor {
        #[arg(long)]
        id: String,
    },
    /// Remove an ingredient and every recipe using it
    RemoveIngredient {
        #[arg(long)]
        id: String,
    },
    RemoveRecipe {
        #[arg(long)]
        id: String,
    },
    /// Resolve one relationship field of a record
    Related {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        field: String,
    },
    /// Report recipes holding references to missing records
    Check,
}
