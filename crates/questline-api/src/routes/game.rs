//! Routes for playing a game session.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use questline_core::error::DomainError;
use questline_narrative::domain::themes::ThemeInfo;
use questline_session::application::command_handlers::{self, TurnView};
use questline_session::application::query_handlers::{self, SessionView};
use questline_session::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /start.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartGameRequest {
    /// Theme identifier, e.g. `medieval-fantasy`.
    pub theme: String,
    /// Optional display name for the player character.
    pub character_name: String,
}

/// Request body for POST /action.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TakeActionRequest {
    /// The session to advance. Parsed in the handler so a malformed id is
    /// reported as `invalid_input`.
    pub session_id: Option<String>,
    /// The chosen or free-form action.
    pub action: String,
}

/// POST /start
#[instrument(skip(state, request), fields(theme = %request.theme))]
async fn start_game(
    State(state): State<AppState>,
    Json(request): Json<StartGameRequest>,
) -> Result<Json<TurnView>, ApiError> {
    let command = commands::StartGame {
        correlation_id: Uuid::new_v4(),
        theme: request.theme,
        character_name: request.character_name,
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    let view = command_handlers::handle_start_game(&command, &state.services).await?;

    Ok(Json(view))
}

fn parse_session_id(raw: Option<&str>) -> Result<Uuid, DomainError> {
    let raw = raw
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DomainError::InvalidInput("session id is required".into()))?;
    Uuid::parse_str(raw)
        .map_err(|e| DomainError::InvalidInput(format!("session id is not a valid UUID: {e}")))
}

/// POST /action
#[instrument(skip(state, request))]
async fn take_action(
    State(state): State<AppState>,
    Json(request): Json<TakeActionRequest>,
) -> Result<Json<TurnView>, ApiError> {
    let session_id = parse_session_id(request.session_id.as_deref())?;
    let command = commands::TakeAction {
        correlation_id: Uuid::new_v4(),
        session_id,
        action: request.action,
    };

    info!(
        correlation_id = %command.correlation_id,
        %session_id,
        "handling take_action command"
    );

    let view = command_handlers::handle_take_action(&command, &state.services).await?;

    Ok(Json(view))
}

/// GET /state/{session_id}
#[instrument(skip(state))]
async fn get_state(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_by_id(session_id, &state.services).await?;
    Ok(Json(view))
}

/// GET /themes
async fn list_themes() -> Result<Json<Vec<ThemeInfo>>, ApiError> {
    Ok(Json(query_handlers::list_available_themes()?))
}

/// Returns the router for game sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_game))
        .route("/action", post(take_action))
        .route("/state/{session_id}", get(get_state))
        .route("/themes", get(list_themes))
}
