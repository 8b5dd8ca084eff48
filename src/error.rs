//! Error types for the setup core.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Failures surfaced by the setup flow's persistence operations.
///
/// Parse and range errors never appear here — those live as display strings
/// on the form state and block progression locally.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl SetupError {
    /// Classify a store failure. Constraint violations carry a message fit
    /// for the user; everything else becomes a generic database failure.
    pub fn from_store(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Constraint(msg) => Self::Validation(msg),
            other => Self::Database(other),
        }
    }

    /// The string shown to the user. Validation messages pass through
    /// verbatim; storage internals do not.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Database(_) => "Could not save your configuration. Please try again.".to_string(),
            Self::Unknown(_) => "Something unexpected went wrong. Please try again.".to_string(),
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_failures_become_validation_errors() {
        let err = SetupError::from_store(DatabaseError::Constraint("Dose out of range".into()));
        assert!(matches!(err, SetupError::Validation(_)));
        assert_eq!(err.user_message(), "Dose out of range");
    }

    #[test]
    fn query_failures_get_a_generic_user_message() {
        let err = SetupError::from_store(DatabaseError::Query("no such table: baskets".into()));
        assert!(matches!(err, SetupError::Database(_)));
        assert!(!err.user_message().contains("no such table"));
    }
}
