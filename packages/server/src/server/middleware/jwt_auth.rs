use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::server::auth::{AuthError, JwtService};
use crate::server::error::ApiError;

/// Authenticated caller information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// JWT authentication middleware
///
/// Extracts the bearer token from the Authorization header, verifies it and
/// adds AuthUser to request extensions. Requests without a valid token are
/// rejected with 401 before reaching the handler.
pub async fn require_auth(
    State(jwt_service): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match extract_auth_user(&request, &jwt_service) {
        Ok(user) => {
            debug!(user = %user.username, "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            debug!(error = %err, "Rejected request without valid token");
            ApiError::from(err).into_response()
        }
    }
}

/// Extract and verify JWT token from request
fn extract_auth_user(request: &Request, jwt_service: &JwtService) -> Result<AuthUser, AuthError> {
    let auth_str = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Invalid)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .ok_or(AuthError::Invalid)?;

    let claims = jwt_service.verify_token(token.trim())?;

    Ok(AuthUser {
        username: claims.sub,
    })
}
