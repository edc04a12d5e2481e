//! Blocking HTTP client for the storefront API.
//!
//! Every call funnels through [`ApiClient::request`], which returns the
//! status code and parsed JSON body without judging success: the UI layer
//! decides how to present each response.

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// A raw API response: status code plus parsed JSON body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed response body, `Value::Null` when the body was not JSON.
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking client holding the base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from `API_BASE_URL`, falling back to
    /// `http://localhost:5000`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one request. No retries: a connection failure is turned
    /// into a single descriptive error and the call returns.
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, String)],
    ) -> Result<ApiResponse> {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.client.request(method, &url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| {
            if e.is_connect() {
                anyhow!(
                    "Could not connect to API. Make sure the server is running on {}",
                    self.base_url
                )
            } else {
                anyhow!("Request failed: {e}")
            }
        })?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().unwrap_or(Value::Null);
        Ok(ApiResponse { status, body })
    }

    /// `GET /` - service info, used as a connectivity probe.
    pub fn home(&self) -> Result<ApiResponse> {
        self.request(Method::GET, "/", None, &[])
    }

    /// `POST /users`
    pub fn create_user(&self, body: &Value) -> Result<ApiResponse> {
        self.request(Method::POST, "/users", Some(body), &[])
    }

    /// `GET /users`
    pub fn list_users(&self) -> Result<ApiResponse> {
        self.request(Method::GET, "/users", None, &[])
    }

    /// `GET /users/{id}`
    pub fn get_user(&self, id: i64) -> Result<ApiResponse> {
        self.request(Method::GET, &format!("/users/{id}"), None, &[])
    }

    /// `PUT /users/{id}`
    pub fn update_user(&self, id: i64, body: &Value) -> Result<ApiResponse> {
        self.request(Method::PUT, &format!("/users/{id}"), Some(body), &[])
    }

    /// `DELETE /users/{id}`
    pub fn delete_user(&self, id: i64) -> Result<ApiResponse> {
        self.request(Method::DELETE, &format!("/users/{id}"), None, &[])
    }

    /// `POST /products`
    pub fn create_product(&self, body: &Value) -> Result<ApiResponse> {
        self.request(Method::POST, "/products", Some(body), &[])
    }

    /// `GET /products` with optional filters.
    pub fn list_products(&self, params: &[(&str, String)]) -> Result<ApiResponse> {
        self.request(Method::GET, "/products", None, params)
    }

    /// `GET /products/{id}`
    pub fn get_product(&self, id: i64) -> Result<ApiResponse> {
        self.request(Method::GET, &format!("/products/{id}"), None, &[])
    }

    /// `PUT /products/{id}`
    pub fn update_product(&self, id: i64, body: &Value) -> Result<ApiResponse> {
        self.request(Method::PUT, &format!("/products/{id}"), Some(body), &[])
    }

    /// `DELETE /products/{id}`
    pub fn delete_product(&self, id: i64) -> Result<ApiResponse> {
        self.request(Method::DELETE, &format!("/products/{id}"), None, &[])
    }

    /// `POST /orders`
    pub fn create_order(&self, body: &Value) -> Result<ApiResponse> {
        self.request(Method::POST, "/orders", Some(body), &[])
    }

    /// `PUT /orders/{order_id}/add_product/{product_id}`
    pub fn add_product_to_order(&self, order_id: i64, product_id: i64) -> Result<ApiResponse> {
        self.request(
            Method::PUT,
            &format!("/orders/{order_id}/add_product/{product_id}"),
            None,
            &[],
        )
    }

    /// `DELETE /orders/{order_id}/remove_product/{product_id}`
    pub fn remove_product_from_order(
        &self,
        order_id: i64,
        product_id: i64,
    ) -> Result<ApiResponse> {
        self.request(
            Method::DELETE,
            &format!("/orders/{order_id}/remove_product/{product_id}"),
            None,
            &[],
        )
    }

    /// `GET /orders/user/{user_id}`
    pub fn user_orders(&self, user_id: i64) -> Result<ApiResponse> {
        self.request(Method::GET, &format!("/orders/user/{user_id}"), None, &[])
    }

    /// `GET /orders/{order_id}/products`
    pub fn order_products(&self, order_id: i64) -> Result<ApiResponse> {
        self.request(Method::GET, &format!("/orders/{order_id}/products"), None, &[])
    }

    /// `PUT /orders/{order_id}/status`
    pub fn update_order_status(&self, order_id: i64, status: &str) -> Result<ApiResponse> {
        self.request(
            Method::PUT,
            &format!("/orders/{order_id}/status"),
            Some(&serde_json::json!({ "status": status })),
            &[],
        )
    }

    /// `GET /stats`
    pub fn system_stats(&self) -> Result<ApiResponse> {
        self.request(Method::GET, "/stats", None, &[])
    }
}
