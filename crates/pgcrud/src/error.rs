//! Error types for pgcrud

use std::time::Duration;
use thiserror::Error;

/// Result type alias for pgcrud operations
pub type CrudResult<T> = Result<T, CrudError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum CrudError {
    /// Connecting, or preparing the session after connect, failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected a statement. `message` is the driver's text, verbatim.
    #[error("Query error: {message}")]
    Query {
        message: String,
        /// SQLSTATE code, when the failure came from the server
        code: Option<String>,
    },

    /// Malformed call arguments, detected before any SQL is sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

impl CrudError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a query error without a SQLSTATE code
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            code: None,
        }
    }

    /// SQLSTATE code of a server-side failure, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        self.sqlstate() == Some("23505")
    }

    /// Check if this is a foreign key violation error
    pub fn is_foreign_key_violation(&self) -> bool {
        self.sqlstate() == Some("23503")
    }

    /// Convert a tokio_postgres error, keeping the server message and SQLSTATE.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db_err) => Self::Query {
                message: db_err.message().to_string(),
                code: Some(db_err.code().code().to_string()),
            },
            None => Self::query(err.to_string()),
        }
    }
}

impl From<tokio_postgres::Error> for CrudError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::from_db_error(err)
    }
}

impl From<toml::de::Error> for CrudError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_keeps_message_verbatim() {
        let err = CrudError::query("relation \"nope\" does not exist");
        assert_eq!(
            err.to_string(),
            "Query error: relation \"nope\" does not exist"
        );
        assert_eq!(err.sqlstate(), None);
    }

    #[test]
    fn test_sqlstate_helpers() {
        let err = CrudError::Query {
            message: "duplicate key value violates unique constraint".to_string(),
            code: Some("23505".to_string()),
        };
        assert!(err.is_unique_violation());
        assert!(!err.is_foreign_key_violation());
        assert!(!CrudError::validation("x").is_unique_violation());
    }
}
