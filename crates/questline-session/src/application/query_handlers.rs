//! Query handlers for the Session context.

use questline_character::domain::stats::CharacterStats;
use questline_core::error::DomainError;
use questline_narrative::domain::progression::{Progression, is_ending_window};
use questline_narrative::domain::story::StoryTurn;
use questline_narrative::domain::themes::{Theme, ThemeInfo, list_themes};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::command_handlers::load_live_session;
use super::services::SessionServices;

/// Full read-only projection of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Story setting.
    pub theme: Theme,
    /// Player character's name.
    pub character_name: String,
    /// Current stats.
    #[serde(rename = "characterStats")]
    pub stats: CharacterStats,
    /// Held items.
    pub inventory: Vec<String>,
    /// Player actions processed so far.
    pub turn_count: u32,
    /// Achievements, major choices, relationships and story arc.
    pub progression: Progression,
    /// Whether the turn budget has been reached.
    pub is_ending_window: bool,
    /// Choices open to the player right now.
    pub current_choices: Vec<String>,
    /// Terminal flag.
    pub is_game_over: bool,
    /// Why the game ended.
    pub game_over_reason: Option<String>,
    /// Every turn so far, oldest first.
    pub story_history: Vec<StoryTurn>,
}

/// Retrieves a session by its identifier.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist or has
/// expired, or `DomainError::Infrastructure` on store failure.
#[instrument(skip(services), fields(%session_id))]
pub async fn get_session_by_id(
    session_id: Uuid,
    services: &SessionServices,
) -> Result<SessionView, DomainError> {
    let session = load_live_session(services, session_id, services.clock.now()).await?;
    let current_choices = session.current_choices();

    Ok(SessionView {
        session_id: session.id,
        theme: session.theme,
        character_name: session.character_name,
        stats: session.stats,
        inventory: session.inventory,
        turn_count: session.turn_count,
        is_ending_window: is_ending_window(session.turn_count, services.config.turn_budget()),
        progression: session.progression,
        current_choices,
        is_game_over: session.is_game_over,
        game_over_reason: session.game_over_reason,
        story_history: session.story_history,
    })
}

/// Lists the selectable themes.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the bundled catalog is corrupt.
pub fn list_available_themes() -> Result<Vec<ThemeInfo>, DomainError> {
    list_themes()
}
