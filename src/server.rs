//! # Server Module
//!
//! HTTP server setup and route configuration for the catalog server.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::jwt::JwtService;
use crate::auth::middleware::AuthMiddleware;
use crate::config::Config;
use crate::database::{DatabaseConnection, migrations};
use crate::repository::{ManufacturerRepository, ProductRepository, UserRepository};
use crate::routes::{auth, health, manufacturers, products, web};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub users: Arc<dyn UserRepository>,
    pub manufacturers: Arc<dyn ManufacturerRepository>,
    pub products: Arc<dyn ProductRepository>,
    /// Present in production; used by `/health`
    pub db: Option<Arc<DatabaseConnection>>,
}

impl AppState {
    /// State backed by one PostgreSQL pool for every repository
    pub fn from_database(jwt_service: JwtService, db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            jwt_service: Arc::new(jwt_service),
            users: db.clone(),
            manufacturers: db.clone(),
            products: db.clone(),
            db: Some(db),
        }
    }
}

/// Assembles every route. HTML routes redirect to `/login` when the session
/// is missing; API writes answer 401.
pub fn build_router(app_state: AppState) -> Router {
    let jwt_service = app_state.jwt_service.clone();

    let public_routes = Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .route("/api", get(web::welcome))
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/manufacturers", get(manufacturers::list_manufacturers))
        .route("/api/manufacturers/{id}", get(manufacturers::get_manufacturer))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login_api))
        .route("/login", post(auth::login_form))
        .route("/logout", get(auth::logout).post(auth::logout));

    // Catalog shows an "admin" link when the visitor holds a valid session
    let catalog_routes = Router::new()
        .route("/", get(web::catalog_page))
        .layer(middleware::from_fn_with_state(jwt_service.clone(), AuthMiddleware::optional_auth));

    let api_write_routes = Router::new()
        .route("/api/products", post(products::create_product))
        .route(
            "/api/products/{id}",
            axum::routing::put(products::update_product).delete(products::delete_product),
        )
        .route("/api/manufacturers", post(manufacturers::create_manufacturer))
        .route(
            "/api/manufacturers/{id}",
            axum::routing::put(manufacturers::update_manufacturer)
                .delete(manufacturers::delete_manufacturer),
        )
        .layer(middleware::from_fn_with_state(jwt_service.clone(), AuthMiddleware::require_api_token));

    let admin_routes = Router::new()
        .route("/admin", get(web::admin_page))
        .route("/admin/products", post(products::submit_new_product))
        .route("/admin/products/{id}", post(products::submit_existing_product))
        .layer(middleware::from_fn_with_state(jwt_service, AuthMiddleware::require_session));

    Router::new()
        .merge(public_routes)
        .merge(catalog_routes)
        .merge(api_write_routes)
        .merge(admin_routes)
        .with_state(app_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::ORIGIN,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true) // Allow cookies for auth
}

/// Loads configuration, connects to the database, applies migrations and
/// serves until Ctrl+C.
pub async fn start() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let jwt_service = JwtService::new(&config.jwt_secret);

    let db = DatabaseConnection::new(config.database.clone()).await?;
    migrations::run_migrations(db.pool()).await?;

    let app = build_router(AppState::from_database(jwt_service, db)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server.cors_origins)),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Catalog server listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
