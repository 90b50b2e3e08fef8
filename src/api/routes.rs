//! Route configuration module.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::handlers::{
    context_menu_handler, explorer_handler, health_handler, index_handler, module_handler,
    readiness_handler,
};
use crate::api::middlewares::jwt_auth;
use crate::api::state::AppState;

/// Creates and configures all application routes.
///
/// # Routes
///
/// ## Health Check Routes
/// - `GET /health` - Liveness probe
/// - `GET /ready` - Readiness probe
///
/// ## Template Routes
/// - `GET /` - Main page
/// - `GET /explorer/{*path}` - Context menu page for a resource (requires JWT authentication)
///
/// ## API Routes (v1)
/// - `POST /v1/menu` - Evaluate the context menu (requires JWT authentication)
/// - `GET /v1/module` - Module descriptor (requires JWT authentication)
pub fn create_routes(state: AppState) -> Router {
    // API v1 routes with JWT authentication
    let v1_routes = Router::new()
        .route("/menu", post(context_menu_handler))
        .route("/module", get(module_handler))
        .route_layer(middleware::from_fn(jwt_auth));

    // Explorer routes with JWT authentication
    let explorer_routes = Router::new()
        .route("/{*path}", get(explorer_handler))
        .route_layer(middleware::from_fn(jwt_auth));

    // Main router
    Router::new()
        // Health check routes (no auth required)
        .route("/health", get(health_handler))
        .route("/ready", get(readiness_handler))
        // Template routes
        .route("/", get(index_handler))
        .nest("/explorer", explorer_routes)
        // API routes
        .nest("/v1", v1_routes)
        // Shared state
        .with_state(state)
}
