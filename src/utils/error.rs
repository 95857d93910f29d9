use crate::domain::model::{Collection, RecordId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("There is no {collection} with the id {id}")]
    NotFound { collection: Collection, id: RecordId },

    #[error("The {field} {value} is already in use")]
    DuplicateValue {
        collection: Collection,
        field: String,
        value: String,
    },

    #[error("{collection} record {id} has a dangling {field} reference to {target}")]
    DanglingReference {
        collection: Collection,
        id: RecordId,
        field: String,
        target: RecordId,
    },

    #[error("Removal of {collection} {id} aborted: {failed} of {total} dependent recipes could not be removed ({reason})")]
    CascadeFailure {
        collection: Collection,
        id: RecordId,
        failed: usize,
        total: usize,
        reason: String,
    },

    #[error("{collection} has no relationship named {field}")]
    UnknownRelation { collection: Collection, field: String },

    #[error("Store operation failed: {message}")]
    Store { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller input violated a uniqueness or existence rule.
    Integrity,
    /// Stored references no longer line up with the collections.
    Reference,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BookError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::DuplicateValue { .. } | Self::UnknownRelation { .. } => {
                ErrorCategory::Integrity
            }
            Self::DanglingReference { .. } | Self::CascadeFailure { .. } => ErrorCategory::Reference,
            Self::Store { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Integrity => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Reference | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::CascadeFailure { collection, id, .. } => format!(
                "Could not remove {collection} {id} because some of its recipes could not be removed"
            ),
            Self::DanglingReference { .. } => {
                format!("The stored data is inconsistent: {self}")
            }
            Self::IoError(_) | Self::SerializationError(_) | Self::Store { .. } => {
                format!("The recipe book could not be read or written: {self}")
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Check the id with the `recipes`, `authors` or `ingredients` command",
            Self::DuplicateValue { .. } => "Pick a value that is not used by another record",
            Self::UnknownRelation { .. } => {
                "Recipes resolve `author` and `ingredients`; authors and ingredients resolve `recipes`"
            }
            Self::DanglingReference { .. } => {
                "Remove or update the record holding the reference, then retry"
            }
            Self::CascadeFailure { .. } => {
                "The record was kept; retry the removal once the store is healthy"
            }
            Self::Store { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                "Check the data directory permissions and the snapshot file contents"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, BookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_field_and_value() {
        let err = BookError::DuplicateValue {
            collection: Collection::Authors,
            field: "email".to_string(),
            value: "a@x.io".to_string(),
        };
        assert_eq!(err.to_string(), "The email a@x.io is already in use");
        assert_eq!(err.category(), ErrorCategory::Integrity);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let config = BookError::MissingConfigError {
            field: "store.data_dir".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);
        assert_eq!(config.exit_code(), 1);

        let storage = BookError::store("disk full");
        assert_eq!(storage.category(), ErrorCategory::Storage);
        assert_eq!(storage.exit_code(), 3);
        assert!(storage.severity() > config.severity());
    }

    #[test]
    fn test_not_found_message() {
        let err = BookError::NotFound {
            collection: Collection::Ingredients,
            id: RecordId::from("abc"),
        };
        assert_eq!(err.to_string(), "There is no ingredients with the id abc");
    }

    #[test]
    fn test_cascade_failure_is_critical() {
        let err = BookError::CascadeFailure {
            collection: Collection::Authors,
            id: RecordId::from("a1"),
            failed: 1,
            total: 3,
            reason: "disk full".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Reference);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
