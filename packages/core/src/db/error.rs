//! Store-level failures: opening the file, creating the schema, running SQL,
//! transaction boundaries and rows that do not decode.

use std::path::PathBuf;
use thiserror::Error;

/// Failure inside the libsql layer
///
/// Missing nodes, cyclic moves and type mismatches are not store failures;
/// they belong to `NodeServiceError`.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Cannot open record tree store at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    #[error("Schema setup failed: {0}")]
    InitializationFailed(String),

    #[error("No permission to create store directory for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Cannot create store directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// Raw libsql error without extra context
    #[error("libsql: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// Statement failed; `context` names the statement and the cause
    #[error("SQL failed: {context}")]
    SqlExecutionError { context: String },

    /// Transaction could not be started, committed or rolled back
    #[error("Transaction {stage} failed: {reason}")]
    TransactionError { stage: &'static str, reason: String },

    /// A stored row could not be decoded into a model
    #[error("Invalid row in {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },
}

impl DatabaseError {
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }

    /// `stage` is one of "begin", "commit", "rollback"
    pub fn transaction(stage: &'static str, reason: impl ToString) -> Self {
        Self::TransactionError {
            stage,
            reason: reason.to_string(),
        }
    }

    pub fn invalid_row(table: &'static str, reason: impl ToString) -> Self {
        Self::InvalidRow {
            table,
            reason: reason.to_string(),
        }
    }
}
