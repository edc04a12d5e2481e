//! Order and cart-association queries.

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::models::{Order, OrderStatus, Product};

/// Insert an order with an empty cart and return the stored row.
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    status: OrderStatus,
) -> Result<Order, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO orders (order_date, user_id, status, total_amount) VALUES (?, ?, ?, 0)",
    )
    .bind(Utc::now())
    .bind(user_id)
    .bind(status.as_str())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

/// Fetch an order by id.
pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// All orders owned by a user, oldest first.
pub async fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
}

/// Products currently associated with an order.
pub async fn products(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT p.* FROM products p
         JOIN order_product op ON op.product_id = p.id
         WHERE op.order_id = ?
         ORDER BY p.id",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await
}

/// Whether the (order, product) association exists.
pub async fn contains_product(
    conn: &mut SqliteConnection,
    order_id: i64,
    product_id: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM order_product WHERE order_id = ? AND product_id = ?",
    )
    .bind(order_id)
    .bind(product_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

/// Create the (order, product) association.
pub async fn add_product(
    conn: &mut SqliteConnection,
    order_id: i64,
    product_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO order_product (order_id, product_id) VALUES (?, ?)")
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Drop the (order, product) association.
pub async fn remove_product(
    conn: &mut SqliteConnection,
    order_id: i64,
    product_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM order_product WHERE order_id = ? AND product_id = ?")
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Recompute `total_amount` as the sum of the associated products' prices
/// and return the new total. Called after every cart membership change.
pub async fn recompute_total(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<f64, sqlx::Error> {
    sqlx::query(
        "UPDATE orders SET total_amount = (
             SELECT COALESCE(SUM(p.price), 0)
             FROM order_product op
             JOIN products p ON p.id = op.product_id
             WHERE op.order_id = ?
         )
         WHERE id = ?",
    )
    .bind(order_id)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query_scalar("SELECT total_amount FROM orders WHERE id = ?")
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await
}

/// Set the order status.
pub async fn set_status(
    conn: &mut SqliteConnection,
    order_id: i64,
    status: OrderStatus,
) -> Result<Order, sqlx::Error> {
    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await
}
