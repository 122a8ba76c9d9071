pub mod handlers;
pub mod models;
pub mod routes;

use anyhow::{Context, Result};
use axum::{http::Method, Router};
use std::future::Future;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::registry::GasRegistry;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GasRegistry>,
}

/// HTTP front end over a registry
pub struct TickerServer {
    addr: String,
    registry: Arc<GasRegistry>,
}

impl TickerServer {
    pub fn new(addr: impl Into<String>, registry: Arc<GasRegistry>) -> Self {
        Self {
            addr: addr.into(),
            registry,
        }
    }

    /// Serve until `shutdown` resolves, then stop every watcher
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("Failed to bind to {}", self.addr))?;

        tracing::info!("Gas ticker listening on {}", self.addr);

        let app = create_router(AppState {
            registry: self.registry.clone(),
        });

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        self.registry.shutdown().await;
        Ok(())
    }
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
