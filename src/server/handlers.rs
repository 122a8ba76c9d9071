use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use super::models::{ApiError, HealthResponse};
use super::AppState;
use crate::error::TickerError;
use crate::models::GasRequest;

/// Status code a registry error maps to
pub fn status_for(error: &TickerError) -> StatusCode {
    match error {
        TickerError::InvalidInput(_) | TickerError::JsonError(_) => StatusCode::BAD_REQUEST,
        TickerError::AlreadyWatching(_) => StatusCode::CONFLICT,
        TickerError::NotWatching(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: TickerError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::warn!(error = %error, "Request rejected");
    }

    (
        status,
        Json(ApiError {
            code: error.to_error_code().to_string(),
            message: error.to_string(),
            details: None,
        }),
    )
        .into_response()
}

/// Start watching a network
pub async fn create_gas(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    tracing::debug!("Got an API request to add a gas");

    let req: GasRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return error_response(TickerError::JsonError(e)),
    };

    match state.registry.add(req).await {
        Ok(gas) => (StatusCode::OK, Json(gas)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Stop watching a network
pub async fn delete_gas(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    tracing::debug!("Got an API request to delete a gas");

    match state.registry.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Everything currently watched, keyed by network
pub async fn list_gas(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.list().await)
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "gas-ticker".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        watching: state.registry.len().await,
    })
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.metrics().render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// 404 Not Found handler
pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            code: "NOT_FOUND".to_string(),
            message: "Not found".to_string(),
            details: None,
        }),
    )
}
