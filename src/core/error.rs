//! Typed error handling for the baseball-agency API
//!
//! Every failure a handler can produce is a variant of [`ApiError`], which
//! knows its HTTP status code and renders the wire shape all endpoints share:
//!
//! ```json
//! { "success": false, "error": 400, "message": "..." }
//! ```
//!
//! # Error Categories
//!
//! - [`ApiError`]: request-level errors mapped to HTTP responses
//! - [`ValidationError`]: request-body validation failures
//! - [`StorageError`]: store backend failures, including the foreign-key
//!   backstop for the referential guard

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// A dependent row that blocks the deletion of its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependent {
    pub id: i64,
    pub name: String,
}

/// The main error type returned by request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Row or route does not exist
    NotFound { resource: String },

    /// Malformed or invalid request body
    BadRequest { message: String },

    /// Request-body validation failed
    Validation(ValidationError),

    /// A supplied foreign key does not reference an existing row
    InvalidReference { field: &'static str, id: i64 },

    /// Deletion blocked: the row is still referenced by dependent players
    StillReferenced {
        resource: &'static str,
        dependents: Vec<Dependent>,
    },

    /// Missing, malformed or expired credential
    Unauthorized { message: String },

    /// Valid credential lacking the required permission
    Forbidden { permission: String },

    /// HTTP method not supported on this route
    MethodNotAllowed,

    /// Unexpected store failure
    Internal { message: String },
}

impl ApiError {
    /// Shorthand for a NotFound over a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for a BadRequest with a message
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            ApiError::StillReferenced { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidReference { .. } => "INVALID_REFERENCE",
            ApiError::StillReferenced { .. } => "STILL_REFERENCED",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Additional response fields for the error, merged into the JSON body
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::StillReferenced { dependents, .. } => Some(serde_json::json!({
                "blocking_players": dependents,
            })),
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound { resource } => {
                write!(f, "{} not found", resource)
            }
            ApiError::BadRequest { message } => write!(f, "{}", message),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::InvalidReference { field, id } => {
                write!(
                    f,
                    "{} {} does not reference an existing {}",
                    field,
                    id,
                    field.trim_end_matches("_id")
                )
            }
            ApiError::StillReferenced {
                resource,
                dependents,
            } => {
                write!(
                    f,
                    "{} cannot be deleted while {} player(s) still belong to it",
                    resource,
                    dependents.len()
                )
            }
            ApiError::Unauthorized { message } => write!(f, "{}", message),
            ApiError::Forbidden { permission } => {
                write!(f, "permission '{}' required", permission)
            }
            ApiError::MethodNotAllowed => write!(f, "method not allowed"),
            ApiError::Internal { message } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "success": false,
            "error": status.as_u16(),
            "message": self.to_string(),
        });
        if let (Some(map), Some(details)) = (body.as_object_mut(), self.details()) {
            if let Some(extra) = details.as_object() {
                for (key, value) in extra {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

/// Errors related to request-body validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed validation
    FieldErrors(Vec<FieldValidationError>),

    /// Patch body contained no fields at all
    EmptyBody,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "validation failed: {}", msgs.join(", "))
            }
            ValidationError::EmptyBody => {
                write!(f, "request body must contain at least one field")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors surfaced by store backends
#[derive(Debug)]
pub enum StorageError {
    /// Delete hit the database foreign-key backstop: dependents appeared
    /// between the guard check and the delete
    StillReferenced { dependents: Vec<Dependent> },

    /// Insert/update referenced a row that does not exist
    InvalidReference { message: String },

    /// Connection, query or lock failure
    Backend { message: String },
}

impl StorageError {
    /// Shorthand for a backend failure with a message
    pub fn backend(message: impl Into<String>) -> Self {
        StorageError::Backend {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::StillReferenced { dependents } => {
                write!(f, "row is still referenced by {} player(s)", dependents.len())
            }
            StorageError::InvalidReference { message } => write!(f, "{}", message),
            StorageError::Backend { message } => write!(f, "storage error: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            // handlers that know the entity override the "row" resource name
            StorageError::StillReferenced { dependents } => ApiError::StillReferenced {
                resource: "row",
                dependents,
            },
            StorageError::InvalidReference { message } => ApiError::BadRequest { message },
            StorageError::Backend { message } => {
                tracing::error!(%message, "storage backend failure");
                ApiError::Internal { message }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
