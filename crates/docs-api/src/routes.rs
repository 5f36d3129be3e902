//! # Routes
//!
//! Axum router configuration for the preview API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Pages (static content):
///   - GET  /api/v1/pages - List pages
///   - GET  /api/v1/pages/{page_id} - Get page content
///
/// - Views (mounted widget state):
///   - POST   /api/v1/pages/{page_id}/views - Mount a view
///   - GET    /api/v1/views/{view_id} - View snapshot
///   - DELETE /api/v1/views/{view_id} - Unmount a view
///   - POST   /api/v1/views/{view_id}/blocks/{block_id}/select - Switch variant
///   - POST   /api/v1/views/{view_id}/blocks/{block_id}/copy - Copy active variant
///
/// - Diagrams:
///   - POST /api/v1/diagrams/render - Render with source fallback
pub fn create_router(state: AppState) -> Router {
    // Preview server: pages may be opened from any local dev origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let page_routes = Router::new()
        .route("/", get(handlers::list_pages))
        .route("/{page_id}", get(handlers::get_page))
        .route("/{page_id}/views", post(handlers::mount_view));

    let view_routes = Router::new()
        .route(
            "/{view_id}",
            get(handlers::get_view).delete(handlers::unmount_view),
        )
        .route(
            "/{view_id}/blocks/{block_id}/select",
            post(handlers::select_variant),
        )
        .route("/{view_id}/blocks/{block_id}/copy", post(handlers::copy_block));

    let diagram_routes = Router::new().route("/render", post(handlers::render_diagram));

    let api_routes = Router::new()
        .nest("/pages", page_routes)
        .nest("/views", view_routes)
        .nest("/diagrams", diagram_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
