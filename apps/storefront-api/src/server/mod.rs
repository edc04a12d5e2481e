//! HTTP/JSON API server.
//!
//! Axum router over the SQLite store. Handlers live in the per-resource
//! submodules; every failure path funnels through [`ApiError`].

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use crate::db::Store;
use crate::error::ApiError;

pub mod orders;
pub mod products;
pub mod stats;
pub mod users;

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The SQLite store.
    pub store: Store,
    /// Application version reported by the root endpoint.
    pub version: String,
}

impl AppState {
    /// Create state over a store, picking up the crate version.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", post(orders::create_order))
        .route(
            "/orders/{order_id}/add_product/{product_id}",
            put(orders::add_product),
        )
        .route(
            "/orders/{order_id}/remove_product/{product_id}",
            axum::routing::delete(orders::remove_product),
        )
        .route("/orders/user/{user_id}", get(orders::user_orders))
        .route("/orders/{order_id}/products", get(orders::order_products))
        .route("/orders/{order_id}/status", put(orders::update_status))
        .route("/stats", get(stats::system_stats))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

/// Root endpoint with service information.
async fn home(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to E-Commerce API",
        "version": state.version,
        "status": "running",
        "available_endpoints": {
            "users": {
                "GET /users": "Get all users",
                "POST /users": "Create new user",
                "GET /users/{id}": "Get user by ID",
                "PUT /users/{id}": "Update user",
                "DELETE /users/{id}": "Delete user"
            },
            "products": {
                "GET /products": "Get all products",
                "POST /products": "Create new product",
                "GET /products/{id}": "Get product by ID",
                "PUT /products/{id}": "Update product",
                "DELETE /products/{id}": "Delete product"
            },
            "orders": {
                "POST /orders": "Create new order",
                "GET /orders/user/{user_id}": "Get user orders",
                "GET /orders/{order_id}/products": "Get order products",
                "PUT /orders/{order_id}/add_product/{product_id}": "Add product to order",
                "DELETE /orders/{order_id}/remove_product/{product_id}": "Remove product from order"
            },
            "extras": {
                "PUT /orders/{order_id}/status": "Update order status",
                "GET /stats": "Get system statistics"
            }
        }
    }))
}

/// Fallback for unknown routes.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}

/// Fallback for known routes hit with an unsupported method.
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed for this endpoint" })),
    )
}

/// Convenience alias for handler results.
pub(crate) type ApiResult<T> = Result<T, ApiError>;
