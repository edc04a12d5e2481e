//! Aggregate statistics, recomputed per call.

use serde::Serialize;
use sqlx::SqliteConnection;

/// System-wide counters and revenue.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    /// Number of users.
    pub total_users: i64,
    /// Number of products.
    pub total_products: i64,
    /// Number of orders.
    pub total_orders: i64,
    /// Sum of all order totals, rounded to 2 decimals.
    pub total_revenue: f64,
}

/// Gather counts and total revenue.
pub async fn gather(conn: &mut SqliteConnection) -> Result<SystemStats, sqlx::Error> {
    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&mut *conn)
        .await?;
    let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&mut *conn)
        .await?;
    let revenue: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_amount), 0) FROM orders")
        .fetch_one(&mut *conn)
        .await?;

    Ok(SystemStats {
        total_users,
        total_products,
        total_orders,
        total_revenue: (revenue * 100.0).round() / 100.0,
    })
}
