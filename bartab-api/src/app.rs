/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use bartab_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = bartab_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use bartab_shared::auth::middleware::create_jwt_middleware;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /login              # Public
///     │   └── POST /refresh            # Public
///     ├── /users/                      # JWT; writes superuser-only
///     ├── /customers/                  # JWT; writes superuser-only
///     │   ├── POST /:id/reconcile      # Re-sum balance from the log
///     │   └── GET /:id/receipt         # Aggregated receipt
///     ├── /transactions/               # JWT; any role records
///     └── /drinks/                     # JWT; writes superuser-only
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (permissive in development, origin list in production)
/// 3. Logging (tower-http TraceLayer)
/// 4. JWT authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Everything below requires a valid access token; per-operation role
    // requirements are asserted inside the handlers
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/", post(routes::users::create_user))
        .route("/:id", delete(routes::users::delete_user));

    let customer_routes = Router::new()
        .route("/", get(routes::customers::list_customers))
        .route("/", post(routes::customers::create_customer))
        .route("/:id", put(routes::customers::rename_customer))
        .route("/:id", delete(routes::customers::delete_customer))
        .route("/:id/reconcile", post(routes::customers::reconcile_customer))
        .route("/:id/receipt", get(routes::customers::customer_receipt));

    let transaction_routes = Router::new()
        .route("/", get(routes::transactions::list_transactions))
        .route("/", post(routes::transactions::create_transaction))
        .route(
            "/customer/:id",
            get(routes::transactions::list_customer_transactions),
        );

    let drink_routes = Router::new()
        .route("/", get(routes::drinks::list_drinks))
        .route("/", post(routes::drinks::create_drink))
        .route("/:id", put(routes::drinks::update_drink))
        .route("/:id", delete(routes::drinks::delete_drink));

    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/customers", customer_routes)
        .nest("/transactions", transaction_routes)
        .nest("/drinks", drink_routes)
        .layer(axum::middleware::from_fn(create_jwt_middleware(
            state.config.jwt.secret.clone(),
        )));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configured allowed origins
        let origins: Vec<HeaderValue> = state
            .config
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
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
