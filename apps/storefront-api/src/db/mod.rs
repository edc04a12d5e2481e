//! SQLite-backed store.
//!
//! The [`Store`] wraps a connection pool and owns schema creation. Query
//! functions live in the per-entity submodules and take a
//! `&mut SqliteConnection`, so a handler decides the transaction scope:
//! simple reads borrow a pooled connection, cart mutations run inside a
//! single explicit transaction.

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use tracing::info;

pub mod orders;
pub mod products;
pub mod stats;
pub mod users;

/// Table definitions, executed in order at startup.
const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        address     TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        phone       TEXT NOT NULL,
        created_at  TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        product_name    TEXT NOT NULL,
        price           REAL NOT NULL,
        description     TEXT,
        stock_quantity  INTEGER NOT NULL DEFAULT 0,
        category        TEXT,
        created_at      TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        order_date    TEXT NOT NULL,
        user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        status        TEXT NOT NULL DEFAULT 'pending',
        total_amount  REAL NOT NULL DEFAULT 0
    )",
    // product_id deliberately carries no foreign key: product deletion is
    // unconditional and leaves join rows behind.
    "CREATE TABLE IF NOT EXISTS order_product (
        order_id    INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        product_id  INTEGER NOT NULL,
        PRIMARY KEY (order_id, product_id)
    )",
];

/// Pooled SQLite store.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a pooled connection to `database_url`, creating the database
    /// file if missing. Foreign keys are enabled on every connection so
    /// user deletion cascades to orders and their join rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the database cannot be
    /// opened.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!(url = database_url, "SQLite connection pool initialized");
        Ok(Self { pool })
    }

    /// Open a single-connection in-memory store, used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be opened.
    pub async fn connect_in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // An in-memory database exists per connection, so the pool must
        // never hand out a second one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the schema if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the DDL statements fail.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Tables ready: users, products, orders, order_product");
        Ok(())
    }

    /// Borrow a pooled connection for read-only work.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is closed.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Begin an explicit transaction for a mutating request.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be checked out.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}
