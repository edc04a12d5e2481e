//! Product endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{ApiResult, AppState};
use crate::db::products;
use crate::error::{ApiError, FieldErrors};
use crate::models::{NewProduct, ProductFilter, ProductUpdate};

/// Raw request body for product create and update.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    /// Product name.
    pub product_name: Option<String>,
    /// Unit price.
    pub price: Option<f64>,
    /// Free-form description.
    pub description: Option<String>,
    /// Inventory count.
    pub stock_quantity: Option<i64>,
    /// Category label.
    pub category: Option<String>,
}

/// Query-string filters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

fn check_common(errors: &mut FieldErrors, payload: &ProductPayload) {
    match &payload.product_name {
        None => errors.push("product_name", "Missing data for required field."),
        Some(name) if name.is_empty() || name.len() > 100 => {
            errors.push("product_name", "Length must be between 1 and 100.");
        }
        Some(_) => {}
    }
    match payload.price {
        None => errors.push("price", "Missing data for required field."),
        Some(price) if price < 0.01 => {
            errors.push("price", "Must be greater than or equal to 0.01.");
        }
        Some(_) => {}
    }
    if payload.stock_quantity.is_some_and(|q| q < 0) {
        errors.push("stock_quantity", "Must be greater than or equal to 0.");
    }
    if payload.description.as_ref().is_some_and(|d| d.len() > 500) {
        errors.push("description", "Longer than maximum length 500.");
    }
    if payload.category.as_ref().is_some_and(|c| c.len() > 50) {
        errors.push("category", "Longer than maximum length 50.");
    }
}

impl ProductPayload {
    fn validate_create(self) -> Result<NewProduct, ApiError> {
        let mut errors = FieldErrors::new();
        check_common(&mut errors, &self);
        errors.into_result()?;

        Ok(NewProduct {
            product_name: self.product_name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            description: self.description,
            stock_quantity: self.stock_quantity.unwrap_or(0),
            category: self.category,
        })
    }

    fn validate_update(self) -> Result<ProductUpdate, ApiError> {
        let mut errors = FieldErrors::new();
        check_common(&mut errors, &self);
        errors.into_result()?;

        Ok(ProductUpdate {
            product_name: self.product_name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            description: self.description,
            stock_quantity: self.stock_quantity,
            category: self.category,
        })
    }
}

/// `POST /products`
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<impl IntoResponse> {
    let new = payload.validate_create()?;

    let mut tx = state.store.begin().await?;
    let product = products::insert(&mut tx, &new).await?;
    tx.commit().await?;

    info!(product_id = product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ProductFilter {
        category: query.category.filter(|c| !c.is_empty()),
        min_price: query.min_price,
        max_price: query.max_price,
    };

    let mut conn = state.store.acquire().await?;
    let products = products::list(&mut conn, &filter).await?;

    if products.is_empty() {
        return Ok(Json(
            json!({ "message": "No products found", "products": [] }),
        ));
    }
    Ok(Json(json!(products)))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = state.store.acquire().await?;
    let product = products::find(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::product_not_found(id))?;
    Ok(Json(product))
}

/// `PUT /products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;
    products::find(&mut tx, id).await?.ok_or(ApiError::InvalidId {
        resource: "product",
    })?;

    let update = payload.validate_update()?;
    let product = products::update(&mut tx, id, &update).await?;
    tx.commit().await?;
    Ok(Json(product))
}

/// `DELETE /products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let mut tx = state.store.begin().await?;
    products::find(&mut tx, id).await?.ok_or(ApiError::InvalidId {
        resource: "product",
    })?;

    products::delete(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Json(
        json!({ "message": format!("Successfully deleted product {id}") }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, price: Option<f64>) -> ProductPayload {
        ProductPayload {
            product_name: name.map(Into::into),
            price,
            description: None,
            stock_quantity: None,
            category: None,
        }
    }

    #[test]
    fn create_requires_name_and_price() {
        let err = payload(None, None).validate_create().unwrap_err();
        let ApiError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let map = errors.by_field();
        assert!(map.contains_key("product_name"));
        assert!(map.contains_key("price"));
    }

    #[test]
    fn price_must_be_positive() {
        assert!(payload(Some("Widget"), Some(0.0)).validate_create().is_err());
        assert!(payload(Some("Widget"), Some(-1.0)).validate_create().is_err());
        assert!(payload(Some("Widget"), Some(0.01)).validate_create().is_ok());
    }

    #[test]
    fn stock_defaults_to_zero() {
        let new = payload(Some("Widget"), Some(10.0)).validate_create().unwrap();
        assert_eq!(new.stock_quantity, 0);
    }

    #[test]
    fn negative_stock_rejected() {
        let mut p = payload(Some("Widget"), Some(10.0));
        p.stock_quantity = Some(-1);
        assert!(p.validate_create().is_err());
    }
}
