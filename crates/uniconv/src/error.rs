//! Error types for the converter library.

use thiserror::Error;

/// Main error type for conversion runs.
#[derive(Error, Debug)]
pub enum UniconvError {
    /// Configuration error (invalid JSON/YAML, missing fields, bad entity definitions)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A source or target connection could not be established
    #[error("Connection error: {message}\n  Context: {context}")]
    Connection { message: String, context: String },

    /// The database rejected a statement issued for an entity
    #[error("Statement failed for entity {entity}: {message}")]
    Statement { entity: String, message: String },

    /// Driver error not yet attributed to an entity
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unknown value converter name
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The run was declined at the confirmation prompt
    #[error("Conversion cancelled")]
    Cancelled,
}

impl UniconvError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(message: impl ToString, context: impl Into<String>) -> Self {
        UniconvError::Connection {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Statement error
    pub fn statement(entity: impl Into<String>, message: impl ToString) -> Self {
        UniconvError::Statement {
            entity: entity.into(),
            message: message.to_string(),
        }
    }

    /// Attach an entity name to a bare driver error.
    pub fn for_entity(self, entity: &str) -> Self {
        match self {
            UniconvError::Database(e) => UniconvError::statement(entity, e),
            other => other,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            UniconvError::Config(_) | UniconvError::Json(_) | UniconvError::Yaml(_) => 1,
            UniconvError::Connection { .. } => 2,
            UniconvError::Statement { .. } | UniconvError::Database(_) => 3,
            UniconvError::Conversion(_) => 4,
            UniconvError::Cancelled => 5,
            UniconvError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, UniconvError>;
