//! Questline: HTTP transport for the game session engine.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn build_app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with configured origins once the web client has a fixed host.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/game", routes::game::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
