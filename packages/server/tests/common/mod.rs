// Common test utilities

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use medicine_parser::{CompletionModel, EngineConfig, MedicineParser, MockModel};
use serde_json::Value;
use server_core::server::auth::{ApiCredentials, JwtService};
use server_core::server::{build_app, AppState};
use tower::ServiceExt;

pub const TEST_USERNAME: &str = "pharmacist";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const TEST_SECRET: &str = "test_secret_key";
pub const TEST_ISSUER: &str = "test_issuer";

/// Router plus handles for assertions
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(model: MockModel) -> Self {
        Self::with_model(Arc::new(model))
    }

    pub fn with_model(model: Arc<dyn CompletionModel>) -> Self {
        let parser = MedicineParser::new(
            model,
            EngineConfig::default().with_upstream_rate(NonZeroU32::new(1000).unwrap()),
        );
        let state = AppState::new(
            parser,
            JwtService::new(TEST_SECRET, TEST_ISSUER),
            ApiCredentials::new(TEST_USERNAME, TEST_PASSWORD),
        );
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    pub fn token(&self) -> String {
        self.token_for(TEST_USERNAME)
    }

    pub fn token_for(&self, username: &str) -> String {
        self.state.jwt_service.create_token(username).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

/// Canned model reply for the components prompt
pub fn components(name: &str, strength: &str, formulation: &str, duration: &str) -> String {
    serde_json::json!({
        "name": name,
        "strength": strength,
        "formulation": formulation,
        "duration": duration,
    })
    .to_string()
}
