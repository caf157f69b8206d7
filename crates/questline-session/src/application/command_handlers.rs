//! Command handlers for the Session context.
//!
//! Each handler works on a private copy of the session: the copy is
//! advanced, the generator is consulted, and only a fully applied turn is
//! written back to the store. A failed generator call leaves the stored
//! session untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use questline_character::domain::stats::CharacterStats;
use questline_core::command::Command;
use questline_core::error::DomainError;
use questline_narrative::domain::context_window::build_request;
use questline_narrative::domain::generator::{GenerationRequest, GeneratorError, TurnResult};
use questline_narrative::domain::progression::{StoryArc, is_ending_window};
use questline_narrative::domain::themes::Theme;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::services::SessionServices;
use crate::domain::aggregates::{Session, TurnOutcome};
use crate::domain::commands::{StartGame, TakeAction};

/// Projection returned after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Narration of the newest turn.
    pub narration: String,
    /// Choices to present; always empty once the game is over.
    pub choices: Vec<String>,
    /// Stats after the turn.
    #[serde(rename = "characterStats")]
    pub stats: CharacterStats,
    /// Inventory after the turn.
    pub inventory: Vec<String>,
    /// Player actions processed so far.
    pub turn_count: u32,
    /// Every achievement so far.
    pub achievements: Vec<String>,
    /// Current narrative phase.
    pub story_arc: StoryArc,
    /// Whether the turn budget has been reached.
    pub is_ending_window: bool,
    /// Terminal flag.
    pub is_game_over: bool,
    /// Why the game ended.
    pub game_over_reason: Option<String>,
    /// Stat deltas reported this turn.
    pub stat_changes: BTreeMap<String, i64>,
    /// Items gained this turn.
    pub items_found: Vec<String>,
    /// Items consumed this turn.
    pub items_used: Vec<String>,
    /// Achievements unlocked this turn.
    pub new_achievements: Vec<String>,
    /// Whether the character gained a level this turn.
    pub leveled_up: bool,
}

impl TurnView {
    fn from_outcome(session: &Session, outcome: TurnOutcome, turn_budget: u32) -> Self {
        Self {
            session_id: session.id,
            narration: outcome.narration,
            choices: outcome.choices,
            stats: session.stats,
            inventory: session.inventory.clone(),
            turn_count: session.turn_count,
            achievements: session.progression.achievements.clone(),
            story_arc: session.progression.story_arc,
            is_ending_window: is_ending_window(session.turn_count, turn_budget),
            is_game_over: session.is_game_over,
            game_over_reason: session.game_over_reason.clone(),
            stat_changes: outcome.stat_changes,
            items_found: outcome.items_found,
            items_used: outcome.items_used,
            new_achievements: outcome.new_achievements,
            leveled_up: outcome.leveled_up,
        }
    }

    /// Projection of a finished session: the last narration, no choices and
    /// no deltas.
    fn terminal(session: &Session, turn_budget: u32) -> Self {
        let narration = session
            .story_history
            .last()
            .map(|turn| turn.narration.clone())
            .unwrap_or_default();
        Self::from_outcome(
            session,
            TurnOutcome {
                narration,
                ..TurnOutcome::default()
            },
            turn_budget,
        )
    }
}

async fn generate_once(
    services: &SessionServices,
    request: &GenerationRequest,
) -> Result<TurnResult, GeneratorError> {
    tokio::time::timeout(
        services.config.generation_timeout,
        services.generator.generate(request),
    )
    .await
    .unwrap_or(Err(GeneratorError::Timeout))
}

/// Asks the generator for the next turn of `session`.
///
/// If the generator no longer recognizes the session's continuation token,
/// the token is cleared on `session` and the same turn is requested once
/// more with a transcript.
async fn request_turn(
    session: &mut Session,
    player_action: Option<&str>,
    services: &SessionServices,
) -> Result<TurnResult, DomainError> {
    let window = services.config.window;
    let request = build_request(&session.narrative_context(), player_action, &window);

    match generate_once(services, &request).await {
        Err(GeneratorError::ContinuationExpired) if request.continuation_token().is_some() => {
            warn!(session_id = %session.id, "continuation token rejected; retrying with transcript");
            session.continuation_token = None;
            let retry = build_request(&session.narrative_context(), player_action, &window);
            Ok(generate_once(services, &retry).await?)
        }
        other => Ok(other?),
    }
}

/// Loads a session, treating expired sessions as missing.
pub(crate) async fn load_live_session(
    services: &SessionServices,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Session, DomainError> {
    services
        .store
        .get(session_id)
        .await?
        .filter(|session| !session.is_expired(now, services.config.session_ttl_delta()))
        .ok_or(DomainError::NotFound(session_id))
}

/// Handles the `StartGame` command: validates the theme, requests the
/// opening turn, and stores the new session.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` for a blank or unknown theme,
/// `DomainError::Generation` if the opening turn cannot be generated, or
/// `DomainError::Infrastructure` if the session cannot be stored.
#[instrument(
    skip(command, services),
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id()
    )
)]
pub async fn handle_start_game(
    command: &StartGame,
    services: &SessionServices,
) -> Result<TurnView, DomainError> {
    let theme: Theme = command.theme.parse()?;
    let turn_budget = services.config.turn_budget();

    let mut session = Session::new(
        Uuid::new_v4(),
        theme,
        &command.character_name,
        services.clock.now(),
    );

    let result = request_turn(&mut session, None, services).await?;
    let outcome = session.apply_turn(result, None, services.clock.now(), turn_budget);
    let view = TurnView::from_outcome(&session, outcome, turn_budget);

    let session_id = session.id;
    services.store.put(session).await?;

    info!(%session_id, theme = %theme, "game session started");
    Ok(view)
}

/// Handles the `TakeAction` command: answers the pending turn, requests the
/// next one, applies it, and commits the session.
///
/// A session that is already over is returned unchanged with no choices.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` for a blank action,
/// `DomainError::NotFound` if the session is unknown or expired,
/// `DomainError::Generation` if the generator fails (nothing is committed),
/// or `DomainError::Infrastructure` on store failure.
#[instrument(
    skip(command, services),
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = %command.session_id
    )
)]
pub async fn handle_take_action(
    command: &TakeAction,
    services: &SessionServices,
) -> Result<TurnView, DomainError> {
    let action = command.action.trim();
    if action.is_empty() {
        return Err(DomainError::InvalidInput("action is required".into()));
    }
    let turn_budget = services.config.turn_budget();

    let guard = services.locks.acquire(command.session_id).await;
    let mut session =
        match load_live_session(services, command.session_id, services.clock.now()).await {
            Ok(session) => session,
            Err(err) => {
                drop(guard);
                if matches!(err, DomainError::NotFound(_)) {
                    services.locks.forget(command.session_id);
                }
                return Err(err);
            }
        };

    if session.is_game_over {
        info!("action ignored; game already over");
        return Ok(TurnView::terminal(&session, turn_budget));
    }

    session.begin_turn();
    let result = request_turn(&mut session, Some(action), services).await?;
    let outcome = session.apply_turn(result, Some(action), services.clock.now(), turn_budget);
    let view = TurnView::from_outcome(&session, outcome, turn_budget);

    services.store.put(session).await?;
    drop(guard);

    info!(
        turn_count = view.turn_count,
        is_game_over = view.is_game_over,
        "turn applied"
    );
    Ok(view)
}
