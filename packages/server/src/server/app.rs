//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use medicine_parser::MedicineParser;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::auth::{ApiCredentials, JwtService};
use crate::server::error::handle_panic;
use crate::server::middleware::{rate_limit, require_auth, RateLimits};
use crate::server::routes::{
    health_handler, issue_token, parse_batch, parse_single, root_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<MedicineParser>,
    pub jwt_service: Arc<JwtService>,
    pub credentials: Arc<ApiCredentials>,
    pub limits: RateLimits,
}

impl AppState {
    pub fn new(parser: MedicineParser, jwt_service: JwtService, credentials: ApiCredentials) -> Self {
        Self {
            parser: Arc::new(parser),
            jwt_service: Arc::new(jwt_service),
            credentials: Arc::new(credentials),
            limits: RateLimits::default(),
        }
    }

    /// Build state from loaded configuration, connecting the parser to the
    /// configured model service.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.parser.build_parser(),
            JwtService::new(config.jwt_secret.expose(), config.jwt_issuer.clone()),
            ApiCredentials::new(config.api_username.clone(), config.api_password.clone()),
        )
    }
}

/// Build the Axum application router
///
/// Extraction routes require a bearer token and are rate limited per caller.
/// Token issuance, the welcome message and the health check are public.
pub fn build_app(state: AppState) -> Router {
    // Rate limiters run inside the auth layer so the caller is known
    let single = Router::new()
        .route("/parse/:vpid", get(parse_single))
        .route_layer(middleware::from_fn_with_state(
            state.limits.single.clone(),
            rate_limit,
        ));

    let batch = Router::new()
        .route("/parse/batch", post(parse_batch))
        .route_layer(middleware::from_fn_with_state(
            state.limits.batch.clone(),
            rate_limit,
        ));

    let protected = single.merge(batch).route_layer(middleware::from_fn_with_state(
        state.jwt_service.clone(),
        require_auth,
    ));

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/auth/token", post(issue_token))
        .merge(protected)
        .with_state(state)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
