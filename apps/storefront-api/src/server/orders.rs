//! Order and cart endpoints.
//!
//! Cart mutations (add/remove product) run inside one transaction so the
//! join-row change, the stock adjustment, and the total recomputation
//! commit together or not at all.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{ApiResult, AppState};
use crate::db::{orders, products, users};
use crate::error::{ApiError, FieldErrors};
use crate::models::OrderStatus;

/// Raw request body for order creation.
#[derive(Debug, Deserialize)]
pub struct OrderPayload {
    /// Owning user.
    pub user_id: Option<i64>,
    /// Initial status, defaults to pending.
    pub status: Option<String>,
}

/// Raw request body for the status update.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    /// New status value.
    pub status: Option<String>,
}

impl OrderPayload {
    /// Validate into `(user_id, status)`, defaulting status to pending.
    fn validate(self) -> Result<(i64, OrderStatus), ApiError> {
        let mut errors = FieldErrors::new();

        if self.user_id.is_none() {
            errors.push("user_id", "Missing data for required field.");
        }
        let status = match self.status.as_deref() {
            None => Some(OrderStatus::Pending),
            Some(raw) => match raw.parse::<OrderStatus>() {
                Ok(status) => Some(status),
                Err(()) => {
                    errors.push(
                        "status",
                        format!("Must be one of: {}.", OrderStatus::valid_list()),
                    );
                    None
                }
            },
        };
        errors.into_result()?;

        Ok((self.user_id.unwrap_or_default(), status.unwrap_or(OrderStatus::Pending)))
    }
}

/// `POST /orders`
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderPayload>,
) -> ApiResult<impl IntoResponse> {
    let (user_id, status) = payload.validate()?;

    let mut tx = state.store.begin().await?;
    users::find(&mut tx, user_id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(user_id))?;

    let order = orders::insert(&mut tx, user_id, status).await?;
    tx.commit().await?;

    info!(order_id = order.id, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// `PUT /orders/{order_id}/add_product/{product_id}`
pub async fn add_product(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;

    orders::find(&mut tx, order_id)
        .await?
        .ok_or_else(|| ApiError::order_not_found(order_id))?;
    let product = products::find(&mut tx, product_id)
        .await?
        .ok_or_else(|| ApiError::product_not_found(product_id))?;

    if orders::contains_product(&mut tx, order_id, product_id).await? {
        return Err(ApiError::Conflict(
            "Product is already in this order".to_string(),
        ));
    }
    if product.stock_quantity <= 0 {
        return Err(ApiError::BadRequest("Product is out of stock".to_string()));
    }

    orders::add_product(&mut tx, order_id, product_id).await?;
    products::adjust_stock(&mut tx, product_id, -1).await?;
    let order_total = orders::recompute_total(&mut tx, order_id).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": format!("Product {} added to order {order_id}", product.product_name),
        "order_total": order_total,
    })))
}

/// `DELETE /orders/{order_id}/remove_product/{product_id}`
pub async fn remove_product(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;

    orders::find(&mut tx, order_id)
        .await?
        .ok_or_else(|| ApiError::order_not_found(order_id))?;
    let product = products::find(&mut tx, product_id)
        .await?
        .ok_or_else(|| ApiError::product_not_found(product_id))?;

    if !orders::contains_product(&mut tx, order_id, product_id).await? {
        return Err(ApiError::NotFound(
            "Product is not in this order".to_string(),
        ));
    }

    orders::remove_product(&mut tx, order_id, product_id).await?;
    products::adjust_stock(&mut tx, product_id, 1).await?;
    let order_total = orders::recompute_total(&mut tx, order_id).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": format!("Product {} removed from order {order_id}", product.product_name),
        "order_total": order_total,
    })))
}

/// `GET /orders/user/{user_id}`
pub async fn user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = state.store.acquire().await?;
    users::find(&mut conn, user_id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(user_id))?;

    let orders = orders::list_for_user(&mut conn, user_id).await?;
    if orders.is_empty() {
        return Ok(Json(json!({
            "message": format!("No orders found for user {user_id}"),
            "orders": [],
        })));
    }
    Ok(Json(json!(orders)))
}

/// `GET /orders/{order_id}/products`
pub async fn order_products(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = state.store.acquire().await?;
    let order = orders::find(&mut conn, order_id)
        .await?
        .ok_or_else(|| ApiError::order_not_found(order_id))?;

    let products = orders::products(&mut conn, order_id).await?;
    if products.is_empty() {
        return Ok(Json(json!({
            "message": format!("No products found in order {order_id}"),
            "products": [],
            "order_total": order.total_amount,
        })));
    }

    Ok(Json(json!({
        "message": format!("Found {} products in order {order_id}", products.len()),
        "products": products,
        "order_total": order.total_amount,
    })))
}

/// `PUT /orders/{order_id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;
    orders::find(&mut tx, order_id)
        .await?
        .ok_or_else(|| ApiError::order_not_found(order_id))?;

    let Some(raw) = payload.status else {
        return Err(ApiError::BadRequest("Status is required".to_string()));
    };
    let status = raw.parse::<OrderStatus>().map_err(|()| {
        ApiError::BadRequest(format!(
            "Invalid status. Must be one of: {}",
            OrderStatus::valid_list()
        ))
    })?;

    let order = orders::set_status(&mut tx, order_id, status).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": format!("Order {order_id} status updated to {status}"),
        "order": order,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_payload_requires_user_id() {
        let payload = OrderPayload {
            user_id: None,
            status: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn order_payload_defaults_status_to_pending() {
        let payload = OrderPayload {
            user_id: Some(1),
            status: None,
        };
        let (user_id, status) = payload.validate().unwrap();
        assert_eq!(user_id, 1);
        assert_eq!(status, OrderStatus::Pending);
    }

    #[test]
    fn order_payload_rejects_unknown_status() {
        let payload = OrderPayload {
            user_id: Some(1),
            status: Some("archived".into()),
        };
        assert!(payload.validate().is_err());
    }
}
