/// Configuration for the API server
///
/// Loaded from environment variables, with a `.env` file picked up in
/// development.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `API_PRODUCTION`: enables HSTS (default: false)
/// - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: *)
/// - `CATALOG_BASE_URL`: product catalog (default: https://fakestoreapi.com)
/// - `CATALOG_TIMEOUT_SECONDS`: catalog request timeout (default: none)
/// - `RUST_LOG`: log filter
///
/// # Example
///
/// ```no_run
/// use prodlist_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use prodlist_shared::catalog::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Product catalog configuration
    pub catalog: CatalogConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (HSTS on)
    pub production: bool,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Product catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog base URL
    pub base_url: String,

    /// Per-request timeout in seconds; `None` waits indefinitely
    pub timeout_seconds: Option<u64>,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric or boolean
    /// variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let production = env::var("API_PRODUCTION")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()?;

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let catalog_base_url =
            env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let catalog_timeout = match env::var("CATALOG_TIMEOUT_SECONDS") {
            Ok(value) if !value.trim().is_empty() => Some(value.trim().parse::<u64>()?),
            _ => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                production,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            catalog: CatalogConfig {
                base_url: catalog_base_url,
                timeout_seconds: catalog_timeout,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
