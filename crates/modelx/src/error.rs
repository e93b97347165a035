//! Error types for modelx

use crate::statement::StatementKind;
use thiserror::Error;

/// Result type alias for modelx operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for binding, statement building and execution
#[derive(Debug, Error)]
pub enum ModelError {
    /// A declared field could not be read from the record instance
    #[error("could not find field '{field}' in {type_name}")]
    FieldNotFound {
        field: String,
        type_name: &'static str,
    },

    /// No binding matches the record's declared key column
    #[error("key column '{key}' is not declared on table '{table}'")]
    KeyNotDeclared { table: String, key: String },

    /// Nothing left to write after the key column was handled
    #[error("{kind} on table '{table}' has no columns to write")]
    EmptyColumnSet { table: String, kind: StatementKind },

    /// The same column was bound more than once
    #[error("column '{column}' is bound more than once for table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Error reported by the database layer, passed through unchanged
    #[error("Execution error: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Statement timeout error
    #[error("Statement timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// The transaction body failed and the rollback failed as well
    #[error("{error} (rollback failed: {rollback})")]
    RollbackFailed {
        error: Box<ModelError>,
        rollback: tokio_postgres::Error,
    },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl ModelError {
    /// Create a field-not-found error for `type_name`
    pub fn field_not_found(field: impl Into<String>, type_name: &'static str) -> Self {
        Self::FieldNotFound {
            field: field.into(),
            type_name,
        }
    }

    /// Create a key-not-declared error
    pub fn key_not_declared(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self::KeyNotDeclared {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an empty-column-set error
    pub fn empty_column_set(table: impl Into<String>, kind: StatementKind) -> Self {
        Self::EmptyColumnSet {
            table: table.into(),
            kind,
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if the statement was rejected before reaching the database
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::FieldNotFound { .. }
                | Self::KeyNotDeclared { .. }
                | Self::EmptyColumnSet { .. }
                | Self::DuplicateColumn { .. }
        )
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// The underlying database error, if the database reported one
    pub fn db_error(&self) -> Option<&tokio_postgres::error::DbError> {
        match self {
            Self::Execution(err) => err.as_db_error(),
            _ => None,
        }
    }

    /// SQLSTATE code of the underlying database error
    pub fn sql_state(&self) -> Option<&str> {
        self.db_error().map(|e| e.code().code())
    }

    /// Check if the database rejected the statement with a unique violation (23505)
    pub fn is_unique_violation(&self) -> bool {
        self.sql_state() == Some("23505")
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for ModelError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
