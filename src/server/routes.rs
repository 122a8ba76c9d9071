use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers;
use super::AppState;

/// Create API router with all endpoints
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/gas", get(handlers::list_gas).post(handlers::create_gas))
        .route("/gas/:id", delete(handlers::delete_gas))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
}
