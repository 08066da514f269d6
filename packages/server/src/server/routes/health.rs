use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    cached_entries: usize,
}

/// Liveness message at the root path
pub async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Medicine Parser API",
    })
}

/// Health check endpoint
///
/// The engine holds no connections of its own, so the process being able to
/// answer is the whole check. The model service is not probed.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        cached_entries: state.parser.cached_entries(),
    })
}
