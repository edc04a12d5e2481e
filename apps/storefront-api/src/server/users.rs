//! User endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{ApiResult, AppState};
use crate::db::users;
use crate::error::{ApiError, FieldErrors};
use crate::models::{NewUser, UserUpdate};

/// Raw request body for user create and update. Every field is optional so
/// that a missing field reaches the validator instead of being rejected by
/// deserialization.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// Minimal structural check: one `@`, non-empty local part, and a domain
/// containing an interior dot.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(' ')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn check_name(errors: &mut FieldErrors, name: &Option<String>) {
    match name {
        None => errors.push("name", "Missing data for required field."),
        Some(name) if name.is_empty() || name.len() > 100 => {
            errors.push("name", "Length must be between 1 and 100.");
        }
        Some(_) => {}
    }
}

fn check_email(errors: &mut FieldErrors, email: &Option<String>) {
    match email {
        None => errors.push("email", "Missing data for required field."),
        Some(email) if !is_valid_email(email) => {
            errors.push("email", "Please enter a valid email address");
        }
        Some(_) => {}
    }
}

fn check_optional_lengths(errors: &mut FieldErrors, payload: &UserPayload) {
    if payload.address.as_ref().is_some_and(|a| a.len() > 255) {
        errors.push("address", "Longer than maximum length 255.");
    }
    if payload.phone.as_ref().is_some_and(|p| p.len() > 20) {
        errors.push("phone", "Longer than maximum length 20.");
    }
}

impl UserPayload {
    /// Validate for creation. Address and phone fall back to empty strings
    /// when absent, matching the stored NOT NULL columns.
    fn validate_create(self) -> Result<NewUser, ApiError> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, &self.email);
        check_optional_lengths(&mut errors, &self);
        errors.into_result()?;

        Ok(NewUser {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
        })
    }

    /// Validate for update. Name and email overwrite; absent address and
    /// phone keep the stored values.
    fn validate_update(self) -> Result<UserUpdate, ApiError> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, &self.email);
        check_optional_lengths(&mut errors, &self);
        errors.into_result()?;

        Ok(UserUpdate {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            address: self.address,
            phone: self.phone,
        })
    }
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<impl IntoResponse> {
    let new = payload.validate_create()?;

    let mut tx = state.store.begin().await?;
    if users::email_taken(&mut tx, &new.email).await? {
        return Err(ApiError::duplicate_email());
    }
    let user = users::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut conn = state.store.acquire().await?;
    let users = users::list(&mut conn).await?;

    if users.is_empty() {
        return Ok(Json(json!({ "message": "No users found", "users": [] })));
    }
    Ok(Json(json!(users)))
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = state.store.acquire().await?;
    let user = users::find(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;
    Ok(Json(user))
}

/// `PUT /users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;
    let existing = users::find(&mut tx, id)
        .await?
        .ok_or(ApiError::InvalidId { resource: "user" })?;

    let update = payload.validate_update()?;
    if update.email != existing.email && users::email_taken(&mut tx, &update.email).await? {
        return Err(ApiError::duplicate_email());
    }

    let user = users::update(&mut tx, id, &update).await?;
    tx.commit().await?;
    Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;
    users::find(&mut tx, id)
        .await?
        .ok_or(ApiError::InvalidId { resource: "user" })?;

    let orders = users::order_count(&mut tx, id).await?;
    if orders > 0 {
        warn!(user_id = id, orders, "User has orders - deletion will cascade");
    }

    users::delete(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Json(
        json!({ "message": format!("Successfully deleted user {id}") }),
    ))
}
