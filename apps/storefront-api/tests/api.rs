//! End-to-end API tests over an in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::server::{create_router, AppState};
use storefront_api::Store;

async fn test_app() -> Router {
    let store = Store::connect_in_memory()
        .await
        .expect("in-memory store opens");
    store.migrate().await.expect("schema creates");
    create_router(AppState::new(store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    app.clone().oneshot(request).await.expect("request runs")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

async fn create_user(app: &Router, name: &str, email: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/users",
        Some(json!({ "name": name, "email": email, "address": "1 St", "phone": "555" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("user id")
}

async fn create_product(app: &Router, name: &str, price: f64, stock: i64) -> i64 {
    let response = send(
        app,
        "POST",
        "/products",
        Some(json!({ "product_name": name, "price": price, "stock_quantity": stock })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("product id")
}

async fn create_order(app: &Router, user_id: i64) -> i64 {
    let response = send(app, "POST", "/orders", Some(json!({ "user_id": user_id }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("order id")
}

async fn product_stock(app: &Router, product_id: i64) -> i64 {
    let response = send(app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["stock_quantity"]
        .as_i64()
        .expect("stock")
}

#[tokio::test]
async fn root_reports_service_info() {
    let app = test_app().await;

    let response = send(&app, "GET", "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Welcome to E-Commerce API");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn unknown_route_is_404_and_wrong_method_is_405() {
    let app = test_app().await;

    let response = send(&app, "GET", "/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Endpoint not found");

    let response = send(&app, "DELETE", "/users", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await["error"],
        "Method not allowed for this endpoint"
    );
}

#[tokio::test]
async fn empty_listings_use_wrapper_objects() {
    let app = test_app().await;

    let body = body_json(send(&app, "GET", "/users", None).await).await;
    assert_eq!(body["message"], "No users found");
    assert_eq!(body["users"], json!([]));

    let body = body_json(send(&app, "GET", "/products", None).await).await;
    assert_eq!(body["message"], "No products found");
}

#[tokio::test]
async fn duplicate_email_conflicts_regardless_of_other_fields() {
    let app = test_app().await;
    create_user(&app, "A", "a@x.com").await;

    let response = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "Different", "email": "a@x.com", "address": "2 St", "phone": "777" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "A user with this email already exists"
    );
}

#[tokio::test]
async fn user_validation_reports_field_messages() {
    let app = test_app().await;

    let response = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["name"][0], "Length must be between 1 and 100.");
    assert_eq!(body["email"][0], "Please enter a valid email address");
}

#[tokio::test]
async fn single_character_name_creates_a_user() {
    let app = test_app().await;

    let response = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "A", "email": "a@x.com", "address": "1 St", "phone": "555" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "A");
    assert!(body["id"].as_i64().is_some());
}

#[tokio::test]
async fn missing_user_is_404_on_get_but_400_on_update_and_delete() {
    let app = test_app().await;

    let response = send(&app, "GET", "/users/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User with ID 99 not found");

    let response = send(
        &app,
        "PUT",
        "/users/99",
        Some(json!({ "name": "Ada", "email": "ada@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid user id");

    let response = send(&app, "DELETE", "/users/99", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid user id");
}

#[tokio::test]
async fn user_update_keeps_absent_optional_fields() {
    let app = test_app().await;
    let id = create_user(&app, "Ada", "ada@x.com").await;

    let response = send(
        &app,
        "PUT",
        &format!("/users/{id}"),
        Some(json!({ "name": "Ada L", "email": "ada@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Ada L");
    assert_eq!(body["address"], "1 St");
    assert_eq!(body["phone"], "555");
}

#[tokio::test]
async fn user_update_rejects_email_taken_by_another_user() {
    let app = test_app().await;
    let first = create_user(&app, "Ada", "ada@x.com").await;
    create_user(&app, "Bob", "bob@x.com").await;

    let response = send(
        &app,
        "PUT",
        &format!("/users/{first}"),
        Some(json!({ "name": "Ada", "email": "bob@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-submitting the user's own email is not a conflict.
    let response = send(
        &app,
        "PUT",
        &format!("/users/{first}"),
        Some(json!({ "name": "Ada", "email": "ada@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cart_flow_tracks_stock_and_total() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let product_id = create_product(&app, "Widget", 10.0, 1).await;
    let order_id = create_order(&app, user_id).await;

    // Add: stock 1 -> 0, total 0 -> 10.0.
    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/add_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        format!("Product Widget added to order {order_id}")
    );
    assert_eq!(body["order_total"], 10.0);
    assert_eq!(product_stock(&app, product_id).await, 0);

    // Second add of the same pair conflicts without side effects.
    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/add_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Product is already in this order"
    );
    assert_eq!(product_stock(&app, product_id).await, 0);

    // Remove: stock back to 1, total back to 0.
    let response = send(
        &app,
        "DELETE",
        &format!("/orders/{order_id}/remove_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["order_total"], 0.0);
    assert_eq!(product_stock(&app, product_id).await, 1);
}

#[tokio::test]
async fn add_is_blocked_at_zero_stock() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let product_id = create_product(&app, "Rare", 99.0, 0).await;
    let order_id = create_order(&app, user_id).await;

    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/add_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Product is out of stock");
    assert_eq!(product_stock(&app, product_id).await, 0);
}

#[tokio::test]
async fn removing_non_associated_product_leaves_state_unchanged() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let product_id = create_product(&app, "Widget", 10.0, 3).await;
    let order_id = create_order(&app, user_id).await;

    let response = send(
        &app,
        "DELETE",
        &format!("/orders/{order_id}/remove_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Product is not in this order"
    );
    assert_eq!(product_stock(&app, product_id).await, 3);

    let body = body_json(
        send(&app, "GET", &format!("/orders/{order_id}/products"), None).await,
    )
    .await;
    assert_eq!(body["order_total"], 0.0);
}

#[tokio::test]
async fn user_orders_listing_covers_missing_empty_and_populated() {
    let app = test_app().await;

    let response = send(&app, "GET", "/orders/user/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User with ID 99 not found");

    let user_id = create_user(&app, "A", "a@x.com").await;
    let body = body_json(
        send(&app, "GET", &format!("/orders/user/{user_id}"), None).await,
    )
    .await;
    assert_eq!(
        body["message"],
        format!("No orders found for user {user_id}")
    );
    assert_eq!(body["orders"], json!([]));

    let order_id = create_order(&app, user_id).await;
    let body = body_json(
        send(&app, "GET", &format!("/orders/user/{user_id}"), None).await,
    )
    .await;
    let orders = body.as_array().expect("order array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"].as_i64(), Some(order_id));
    assert_eq!(orders[0]["user_id"].as_i64(), Some(user_id));
}

#[tokio::test]
async fn order_products_listing_reports_count_and_total() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let order_id = create_order(&app, user_id).await;

    let body = body_json(
        send(&app, "GET", &format!("/orders/{order_id}/products"), None).await,
    )
    .await;
    assert_eq!(
        body["message"],
        format!("No products found in order {order_id}")
    );

    let first = create_product(&app, "Widget", 10.0, 1).await;
    let second = create_product(&app, "Gadget", 2.5, 1).await;
    for product_id in [first, second] {
        let response = send(
            &app,
            "PUT",
            &format!("/orders/{order_id}/add_product/{product_id}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body = body_json(
        send(&app, "GET", &format!("/orders/{order_id}/products"), None).await,
    )
    .await;
    assert_eq!(
        body["message"],
        format!("Found 2 products in order {order_id}")
    );
    assert_eq!(body["products"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["order_total"], 12.5);
}

#[tokio::test]
async fn deleting_a_user_cascades_to_orders() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let order_id = create_order(&app, user_id).await;

    let response = send(&app, "DELETE", &format!("/users/{user_id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        format!("Successfully deleted user {user_id}")
    );

    let response = send(&app, "GET", &format!("/orders/{order_id}/products"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_update_accepts_enumeration_only() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let order_id = create_order(&app, user_id).await;

    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid status. Must be one of: pending, confirmed, shipped, delivered"
    );

    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Status is required");

    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(json!({ "status": "shipped" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        format!("Order {order_id} status updated to shipped")
    );
    assert_eq!(body["order"]["status"], "shipped");
}

#[tokio::test]
async fn order_creation_requires_an_existing_user() {
    let app = test_app().await;

    let response = send(&app, "POST", "/orders", Some(json!({ "user_id": 42 }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User with ID 42 not found");

    let response = send(&app, "POST", "/orders", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_filters_combine_with_and() {
    let app = test_app().await;
    let cheap = create_product(&app, "Pencil", 1.0, 10).await;
    let mid = create_product(&app, "Notebook", 5.0, 10).await;
    create_product(&app, "Desk", 150.0, 2).await;

    let response = send(
        &app,
        "PUT",
        &format!("/products/{mid}"),
        Some(json!({ "product_name": "Notebook", "price": 5.0, "category": "Stationery" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(
        &app,
        "PUT",
        &format!("/products/{cheap}"),
        Some(json!({ "product_name": "Pencil", "price": 1.0, "category": "stationery" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Case-insensitive substring match.
    let body = body_json(send(&app, "GET", "/products?category=STATION", None).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    // Filters AND together.
    let body = body_json(
        send(&app, "GET", "/products?category=station&min_price=2", None).await,
    )
    .await;
    let listed = body.as_array().expect("product array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"].as_i64(), Some(mid));

    let body = body_json(send(&app, "GET", "/products?max_price=10", None).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let body = body_json(send(&app, "GET", "/products?min_price=1000", None).await).await;
    assert_eq!(body["message"], "No products found");
}

#[tokio::test]
async fn product_delete_leaves_cart_rows_behind() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let product_id = create_product(&app, "Widget", 10.0, 1).await;
    let order_id = create_order(&app, user_id).await;

    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/add_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "DELETE", &format!("/products/{product_id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The join row survives; the listing simply no longer finds the product.
    let body = body_json(
        send(&app, "GET", &format!("/orders/{order_id}/products"), None).await,
    )
    .await;
    assert_eq!(
        body["message"],
        format!("No products found in order {order_id}")
    );
}

#[tokio::test]
async fn stats_aggregate_counts_and_revenue() {
    let app = test_app().await;
    let user_id = create_user(&app, "A", "a@x.com").await;
    let product_id = create_product(&app, "Widget", 10.0, 5).await;
    let order_id = create_order(&app, user_id).await;

    let response = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/add_product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(send(&app, "GET", "/stats", None).await).await;
    let stats = &body["system_stats"];
    assert_eq!(stats["total_users"], 1);
    assert_eq!(stats["total_products"], 1);
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["total_revenue"], 10.0);
}
