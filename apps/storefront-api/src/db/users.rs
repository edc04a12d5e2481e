//! User queries.

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::models::{NewUser, User, UserUpdate};

/// Insert a user and return the stored row.
pub async fn insert(conn: &mut SqliteConnection, new: &NewUser) -> Result<User, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (name, address, email, phone, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&new.name)
    .bind(&new.address)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

/// Fetch a user by id.
pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// All users, oldest first.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(&mut *conn)
        .await
}

/// Whether any user already holds `email`.
pub async fn email_taken(conn: &mut SqliteConnection, email: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

/// Apply an update and return the stored row. Absent optional fields keep
/// their stored values.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    update: &UserUpdate,
) -> Result<User, sqlx::Error> {
    sqlx::query(
        "UPDATE users SET name = ?, email = ?,
         address = COALESCE(?, address), phone = COALESCE(?, phone)
         WHERE id = ?",
    )
    .bind(&update.name)
    .bind(&update.email)
    .bind(update.address.as_deref())
    .bind(update.phone.as_deref())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

/// Delete a user. Orders and their join rows go with it via the cascading
/// foreign keys.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Number of orders owned by a user, for the cascade warning log.
pub async fn order_count(conn: &mut SqliteConnection, id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}
