use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchange the API username/password for a 24-hour bearer token
pub async fn issue_token(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> Result<Json<TokenResponse>, ApiError> {
    if !state.credentials.verify(&params.username, &params.password) {
        warn!(user = %params.username, "Token request with invalid credentials");
        return Err(ApiError::InvalidCredentials);
    }

    let access_token = state
        .jwt_service
        .create_token(&params.username)
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))?;

    info!(user = %params.username, "Issued access token");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
