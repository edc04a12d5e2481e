//! Error handling for the API service.
//!
//! Every handler returns [`ApiError`] on the failure path; its
//! [`IntoResponse`] impl maps the error taxonomy onto HTTP status codes and
//! JSON bodies:
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | `Validation` | 400 | `{field: [messages], ...}` |
//! | `InvalidId` | 400 | `{"message": "Invalid <resource> id"}` |
//! | `BadRequest` | 400 | `{"error": ...}` |
//! | `NotFound` | 404 | `{"error": ...}` |
//! | `Conflict` | 409 | `{"error": ...}` |
//! | `Database` | 500 | `{"error": "Internal server error"}` |
//!
//! The 400-vs-404 split for missing ids is intentional: user and product
//! update/delete report a missing id as 400 while lookups and all order
//! endpoints use 404, reproducing the recorded behavior of the service.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Accumulated field-level validation messages.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// Whether any message was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Group messages by field for serialization.
    #[must_use]
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<&str>> {
        let mut map: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
        for (field, message) in &self.0 {
            map.entry(field).or_default().push(message.as_str());
        }
        map
    }

    /// Turn the accumulated messages into an error, or `Ok(())` if empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when any message was recorded.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// Error type shared by all handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range request fields.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Missing id reported as a bad request (user/product update and delete).
    #[error("Invalid {resource} id")]
    InvalidId {
        /// Resource name as it appears in the message.
        resource: &'static str,
    },

    /// Business-rule rejection (out of stock, invalid status value).
    #[error("{0}")]
    BadRequest(String),

    /// Missing entity reported as not found.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate email or duplicate cart association.
    #[error("{0}")]
    Conflict(String),

    /// Store failure, surfaced as a 500.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Missing user on a lookup or order-creation path.
    #[must_use]
    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound(format!("User with ID {id} not found"))
    }

    /// Missing product on a lookup path.
    #[must_use]
    pub fn product_not_found(id: i64) -> Self {
        Self::NotFound(format!("Product with ID {id} not found"))
    }

    /// Missing order.
    #[must_use]
    pub fn order_not_found(id: i64) -> Self {
        Self::NotFound(format!("Order with ID {id} not found"))
    }

    /// Duplicate email conflict.
    #[must_use]
    pub fn duplicate_email() -> Self {
        Self::Conflict("A user with this email already exists".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!(errors.by_field()))).into_response()
            }
            Self::InvalidId { resource } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("Invalid {resource} id") })),
            )
                .into_response(),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Self::Conflict(message) => {
                (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_group_by_field() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Please enter a valid email address");
        errors.push("name", "Missing data for required field");
        errors.push("email", "Shorter than minimum length");

        let map = errors.by_field();
        assert_eq!(map["email"].len(), 2);
        assert_eq!(map["name"].len(), 1);
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn non_empty_field_errors_become_validation() {
        let mut errors = FieldErrors::new();
        errors.push("price", "Must be greater than 0");
        assert!(matches!(
            errors.into_result(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn status_mapping() {
        let resp = ApiError::duplicate_email().into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiError::user_not_found(7).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::InvalidId { resource: "user" }.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::BadRequest("Product is out of stock".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
