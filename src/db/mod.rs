// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).

pub mod schema;
pub mod sqlite;

pub use sqlite::Db;

/// Which table constraint a write tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    Other,
}

/// Typed outcome of a failed store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("Constraint violation ({kind:?}): {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    #[error("Failed to open database: {0}")]
    Open(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unexpected stored value: {0}")]
    Corrupt(String),

    #[error("Database worker failed: {0}")]
    Worker(String),
}

impl StoreError {
    /// Replace the message of a constraint violation of the given kind.
    pub fn with_constraint_message(self, kind: ConstraintKind, message: &str) -> Self {
        match self {
            StoreError::Constraint { kind: k, .. } if k == kind => StoreError::Constraint {
                kind,
                message: message.to_string(),
            },
            other => other,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi;

        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                let kind = match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        ConstraintKind::Unique
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
                    _ => ConstraintKind::Other,
                };
                return StoreError::Constraint {
                    kind,
                    message: message
                        .clone()
                        .unwrap_or_else(|| "constraint failed".to_string()),
                };
            }
        }

        if let rusqlite::Error::FromSqlConversionFailure(column, _, cause) = &err {
            return StoreError::Corrupt(format!("column {}: {}", column, cause));
        }

        StoreError::Query(err.to_string())
    }
}
