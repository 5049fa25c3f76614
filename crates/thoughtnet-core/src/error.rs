//! Error types for thoughtnet operations.
//!
//! Unknown names are not errors: graph operations on missing nodes are
//! silent no-ops. What remains is the durable mirror failing, malformed
//! query input, and bad configuration.

use thiserror::Error;

/// Result type for thoughtnet operations.
pub type Result<T> = std::result::Result<T, ThoughtError>;

/// Errors that can occur in thoughtnet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThoughtError {
    /// The persistence store was unreachable or rejected an operation.
    #[error("Data access failed during {operation}: {message}")]
    DataAccess { operation: String, message: String },

    /// A query sentence contained no tokens.
    #[error("Query is empty")]
    EmptyQuery,

    /// A configuration value was rejected.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Serialization of a snapshot or record failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ThoughtError {
    fn from(e: serde_json::Error) -> Self {
        ThoughtError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl ThoughtError {
    pub fn data_access(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ThoughtError::DataAccess {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ThoughtError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from the persistence layer.
    pub fn is_data_access(&self) -> bool {
        matches!(self, ThoughtError::DataAccess { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_access_message_names_the_operation() {
        let err = ThoughtError::data_access("save_edge", "disk full");
        assert!(err.is_data_access());
        assert_eq!(err.to_string(), "Data access failed during save_edge: disk full");
    }

    #[test]
    fn empty_query_is_not_a_data_access_failure() {
        assert!(!ThoughtError::EmptyQuery.is_data_access());
    }
}
