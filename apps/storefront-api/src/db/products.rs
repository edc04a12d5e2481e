//! Product queries.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::{NewProduct, Product, ProductFilter, ProductUpdate};

/// Insert a product and return the stored row.
pub async fn insert(
    conn: &mut SqliteConnection,
    new: &NewProduct,
) -> Result<Product, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO products (product_name, price, description, stock_quantity, category, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&new.product_name)
    .bind(new.price)
    .bind(new.description.as_deref())
    .bind(new.stock_quantity)
    .bind(new.category.as_deref())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

/// Fetch a product by id.
pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// List products matching `filter`; the filters combine with AND.
///
/// A row with no category never matches a category filter, mirroring SQL
/// NULL comparison semantics in the recorded behavior.
pub async fn list(
    conn: &mut SqliteConnection,
    filter: &ProductFilter,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut query: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("SELECT * FROM products WHERE 1 = 1");

    if let Some(category) = &filter.category {
        query.push(" AND lower(category) LIKE ");
        query.push_bind(format!("%{}%", category.to_lowercase()));
    }
    if let Some(min_price) = filter.min_price {
        query.push(" AND price >= ");
        query.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        query.push(" AND price <= ");
        query.push_bind(max_price);
    }
    query.push(" ORDER BY id");

    query
        .build_query_as::<Product>()
        .fetch_all(&mut *conn)
        .await
}

/// Apply an update and return the stored row. Name and price overwrite;
/// absent optional fields keep their stored values.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    update: &ProductUpdate,
) -> Result<Product, sqlx::Error> {
    sqlx::query(
        "UPDATE products SET product_name = ?, price = ?,
         description = COALESCE(?, description),
         stock_quantity = COALESCE(?, stock_quantity),
         category = COALESCE(?, category)
         WHERE id = ?",
    )
    .bind(&update.product_name)
    .bind(update.price)
    .bind(update.description.as_deref())
    .bind(update.stock_quantity)
    .bind(update.category.as_deref())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

/// Delete a product. Join rows referencing it are left behind by design.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Adjust stock by `delta` (+1 on cart removal, -1 on cart addition).
pub async fn adjust_stock(
    conn: &mut SqliteConnection,
    id: i64,
    delta: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE products SET stock_quantity = stock_quantity + ? WHERE id = ?")
        .bind(delta)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
