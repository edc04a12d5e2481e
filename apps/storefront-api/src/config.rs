//! Service configuration, parsed from environment variables.

/// Default HTTP server port.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db";

/// Parsed configuration from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// SQLite database URL (`DATABASE_URL`).
    pub database_url: String,
    /// HTTP server port (`HTTP_PORT`).
    pub http_port: u16,
    /// Bind address (`BIND_ADDRESS`).
    pub bind_address: String,
}

impl ApiConfig {
    /// Parse configuration from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let http_port = match std::env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("HTTP_PORT must be a port number, got '{raw}'"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Self {
            database_url,
            http_port,
            bind_address,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}
