// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp))]

//! Storefront API - E-Commerce Back End
//!
//! HTTP/JSON service over a SQLite store, managing users, products, and
//! orders with a cart join table.
//!
//! # Layers
//!
//! - [`models`]: row types, validated input shapes, the order status enum
//! - [`db`]: the pooled store, schema creation, and per-entity queries
//! - [`server`]: the Axum router and request handlers
//! - [`error`]: the shared error taxonomy and its HTTP mapping
//! - [`config`]: environment-driven configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;

pub use config::ApiConfig;
pub use db::Store;
pub use error::ApiError;
pub use server::{create_router, AppState};
