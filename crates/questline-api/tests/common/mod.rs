//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questline_core::clock::Clock;
use questline_narrative::domain::generator::NarrativeGenerator;
use questline_session::application::services::{EngineConfig, SessionServices};
use questline_session::infrastructure::in_memory_store::InMemorySessionStore;
use questline_test_support::{FixedClock, fixed_now};
use tower::ServiceExt;

use questline_api::state::AppState;

/// Build session services over an in-memory store and a fixed clock.
pub fn build_services(generator: Arc<dyn NarrativeGenerator>) -> SessionServices {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
    SessionServices::new(
        clock,
        Arc::new(InMemorySessionStore::new()),
        generator,
        EngineConfig::default(),
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(services: SessionServices) -> Router {
    questline_api::build_app(AppState::new(services))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
