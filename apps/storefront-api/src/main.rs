//! Storefront API Binary
//!
//! Starts the e-commerce HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin storefront-api
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite database URL (default: sqlite://storefront.db)
//! - `HTTP_PORT`: HTTP server port (default: 5000)
//! - `BIND_ADDRESS`: Bind address (default: 0.0.0.0)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;

use storefront_api::server::{create_router, AppState};
use storefront_api::{ApiConfig, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    init_tracing();

    tracing::info!("Starting Storefront API");

    let config = ApiConfig::from_env()?;
    tracing::info!(
        database_url = %config.database_url,
        port = config.http_port,
        "Configuration loaded"
    );

    let store = Store::connect(&config.database_url).await?;
    store.migrate().await?;

    let app = create_router(AppState::new(store));
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.http_port).parse()?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /");
    tracing::info!("  POST   /users            GET /users            GET/PUT/DELETE /users/{{id}}");
    tracing::info!("  POST   /products         GET /products         GET/PUT/DELETE /products/{{id}}");
    tracing::info!("  POST   /orders           GET /orders/user/{{user_id}}");
    tracing::info!("  PUT    /orders/{{oid}}/add_product/{{pid}}");
    tracing::info!("  DELETE /orders/{{oid}}/remove_product/{{pid}}");
    tracing::info!("  GET    /orders/{{oid}}/products");
    tracing::info!("  PUT    /orders/{{oid}}/status");
    tracing::info!("  GET    /stats");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Storefront API stopped");
    Ok(())
}

/// Load .env file from the current or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Initialize the tracing subscriber with environment filter.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storefront_api=info")),
        )
        .init();
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed. Failure to install them
/// means the process cannot respond to termination signals, so failing fast
/// at startup is preferable.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
