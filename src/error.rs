// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::{ConstraintKind, StoreError};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input failed a validation rule. `field` names the offending input
    /// when the failure can be pinned to one.
    #[error("Validation failed: {message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Uniqueness or referential-integrity violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Validation error tagged with the input field that failed.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    /// The field tag carried by a validation error, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::Validation { field, .. } => *field,
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Constraint {
                kind: ConstraintKind::Unique | ConstraintKind::ForeignKey,
                message,
            } => AppError::Conflict(message),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

/// Validation errors always carry `field`, even when it is null.
#[derive(Serialize)]
struct ValidationErrorResponse {
    error: &'static str,
    message: String,
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Validation { field, message } => {
                let body = ValidationErrorResponse {
                    error: "VALIDATION_ERROR",
                    message,
                    field,
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
