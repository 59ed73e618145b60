/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use prodlist_api::{app::AppState, config::Config};
/// use prodlist_shared::catalog::HttpCatalogClient;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let catalog = HttpCatalogClient::new(&config.catalog.base_url, config.catalog.timeout())?;
/// let state = AppState::new(pool, config, Arc::new(catalog));
/// let app = prodlist_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use prodlist_shared::auth::middleware::{require_admin, require_api_key};
use prodlist_shared::catalog::ProductCatalog;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Product catalog used on favorite cache misses
    pub catalog: Arc<dyn ProductCatalog>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            catalog,
        }
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── GET  /health                         public
/// ├── /auth
/// │   └── POST /login                      public
/// ├── /common                              X-API-Key
/// │   ├── GET  /favorites
/// │   ├── POST /favorites/:id
/// │   └── POST /favorites/:id/delete
/// └── /management                          X-API-Key + admin
///     ├── GET    /user/list
///     ├── POST   /user
///     ├── GET    /user/:id
///     ├── PUT    /user/:id
///     └── DELETE /user/:id
/// ```
///
/// Layers run outermost first: security headers, CORS, tracing, then the
/// per-group gates.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    let common_routes = Router::new()
        .route("/favorites", get(routes::favorites::list_favorites))
        .route("/favorites/:id", post(routes::favorites::add_favorite))
        .route("/favorites/:id/delete", post(routes::favorites::remove_favorite))
        .layer(middleware::from_fn_with_state(
            state.db.clone(),
            require_api_key,
        ));

    let management_routes = Router::new()
        .route("/user/list", get(routes::management::list_users))
        .route("/user", post(routes::management::create_user))
        .route(
            "/user/:id",
            get(routes::management::get_user)
                .put(routes::management::update_user)
                .delete(routes::management::delete_user),
        )
        // Added last so it runs first: token gate, then admin gate
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.db.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/common", common_routes)
        .nest("/management", management_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-api-key")])
        .max_age(std::time::Duration::from_secs(3600))
}
