use axum::{Router, http::Method, middleware as axum_middleware, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::feed::ContentSource;
use crate::server::{ServerConfig, ViewRegistry};
use crate::web::middleware::auth;
use crate::web::routes::*;

pub use error::AppError;

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

#[cfg_attr(not(test), derive(Clone))] // sea-orm `mock` (dev-dep) drops Clone on DatabaseConnection
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub source: Arc<dyn ContentSource>,
    pub views: Arc<ViewRegistry>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    db_pool: DatabaseConnection,
    source: Arc<dyn ContentSource>,
    views: Arc<ViewRegistry>,
    config: Arc<ServerConfig>,
) -> Router {
    let app_state = Arc::new(AppState {
        db_pool,
        source,
        views,
        config,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest("/api/tags", tag_routes::create_public_router())
        .nest("/api", results_routes::create_results_router())
        .nest("/api/backdrop", backdrop_routes::create_backdrop_router())
        .nest(
            "/api/admin/tags",
            tag_routes::create_admin_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::admin_auth)),
        )
        .nest(
            "/api/admin/content",
            content_routes::create_content_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::admin_auth)),
        )
        .nest(
            "/api/capture",
            capture_routes::create_capture_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::admin_auth)),
        )
        .layer(cors)
        .with_state(app_state)
}
