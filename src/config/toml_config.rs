use crate::utils::error::{BookError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_one_of, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const STORE_BACKENDS: [&str; 2] = ["memory", "file"];
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `memory` keeps everything in the process, `file` persists a JSON snapshot.
    pub backend: String,
    pub data_dir: String,
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            data_dir: "./data".to_string(),
            file_name: "recipe_book.json".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn snapshot_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with the environment value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookError::ConfigError {
            message: format!("invalid substitution pattern: {e}"),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_one_of("store.backend", &self.store.backend, &STORE_BACKENDS)?;
        if self.store.backend == "file" {
            validate_path("store.data_dir", &self.store.data_dir)?;
            validate_non_empty_string("store.file_name", &self.store.file_name)?;
            validate_file_extension("store.file_name", &self.store.file_name, &["json"])?;
        }
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("RECIPE_BOOK_TEST_DIR", "/tmp/recipes");
        let config = TomlConfig::from_toml_str(
            r#"
            [store]
            backend = "file"
            data_dir = "${RECIPE_BOOK_TEST_DIR}/book"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.data_dir, "/tmp/recipes/book");
        assert_eq!(
            config.store.snapshot_path(),
            PathBuf::from("/tmp/recipes/book/recipe_book.json")
        );
    }

    #[test]
    fn test_unset_variables_are_kept() {
        let config = TomlConfig::from_toml_str(
            "[store]\ndata_dir = \"${RECIPE_BOOK_SURELY_UNSET_VAR}\"\n",
        )
        .unwrap();
        assert_eq!(config.store.data_dir, "${RECIPE_BOOK_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_validation_rejects_unknown_backend_and_format() {
        let mut config = TomlConfig::default();
        config.store.backend = "mongo".to_string();
        assert!(matches!(
            config.validate(),
            Err(BookError::InvalidConfigValueError { ref field, .. }) if field == "store.backend"
        ));

        let mut config = TomlConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.store.file_name = "book.yaml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_backend_ignores_file_settings() {
        let mut config = TomlConfig::default();
        config.store.backend = "memory".to_string();
        config.store.data_dir = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[store\nbackend = 1").unwrap_err();
        assert!(matches!(err, BookError::ConfigError { .. }));
    }
}
