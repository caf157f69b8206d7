//! Aggregate root for the Session context.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use questline_character::domain::inventory::{add_items, remove_items};
use questline_character::domain::stats::{CharacterStats, apply_deltas, maybe_level_up};
use questline_narrative::domain::context_window::NarrativeContext;
use questline_narrative::domain::generator::TurnResult;
use questline_narrative::domain::progression::Progression;
use questline_narrative::domain::story::StoryTurn;
use questline_narrative::domain::themes::Theme;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Character name used when the player does not give one.
pub const DEFAULT_CHARACTER_NAME: &str = "Adventurer";

/// Game-over reason when health runs out and the generator gives none.
pub const HEALTH_DEPLETED_REASON: &str = "Your health has been depleted.";

/// Game-over reason when the generator ends the story without saying why.
pub const DEFAULT_GAME_OVER_REASON: &str = "Your adventure has come to an end.";

/// One player's run.
///
/// Invariants maintained by [`Session::apply_turn`]:
/// - `turn_count` equals the number of history entries with a player action.
/// - While the game is live, exactly one history entry is pending.
/// - `is_game_over` never goes back to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session identifier.
    pub id: Uuid,
    /// Story setting.
    pub theme: Theme,
    /// Player character's display name.
    pub character_name: String,
    /// Creation time; drives expiry.
    pub created_at: DateTime<Utc>,
    /// Generator-side context handle from the last turn.
    pub continuation_token: Option<String>,
    /// Player actions processed so far.
    pub turn_count: u32,
    /// Character stats.
    pub stats: CharacterStats,
    /// Held items, in acquisition order.
    pub inventory: Vec<String>,
    /// Achievements, major choices, relationships and story arc.
    pub progression: Progression,
    /// Terminal flag.
    pub is_game_over: bool,
    /// Why the game ended.
    pub game_over_reason: Option<String>,
    /// Every turn so far, oldest first.
    pub story_history: Vec<StoryTurn>,
}

/// What a single applied turn changed, for notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The turn's narration.
    pub narration: String,
    /// Choices to present; empty once the game is over.
    pub choices: Vec<String>,
    /// Stat deltas as reported by the generator.
    pub stat_changes: BTreeMap<String, i64>,
    /// Items gained.
    pub items_found: Vec<String>,
    /// Items consumed.
    pub items_used: Vec<String>,
    /// Achievements unlocked.
    pub new_achievements: Vec<String>,
    /// Whether the character gained a level.
    pub leveled_up: bool,
}

impl Session {
    /// Creates a fresh session with default stats and empty collections.
    #[must_use]
    pub fn new(id: Uuid, theme: Theme, character_name: &str, created_at: DateTime<Utc>) -> Self {
        let character_name = match character_name.trim() {
            "" => DEFAULT_CHARACTER_NAME.to_owned(),
            name => name.to_owned(),
        };
        Self {
            id,
            theme,
            character_name,
            created_at,
            continuation_token: None,
            turn_count: 0,
            stats: CharacterStats::default(),
            inventory: Vec::new(),
            progression: Progression::default(),
            is_game_over: false,
            game_over_reason: None,
            story_history: Vec::new(),
        }
    }

    /// Returns `true` once the session has outlived `ttl`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.created_at > ttl
    }

    /// Snapshot used to build the next generator request.
    #[must_use]
    pub fn narrative_context(&self) -> NarrativeContext<'_> {
        NarrativeContext {
            theme: self.theme,
            character_name: &self.character_name,
            stats: &self.stats,
            inventory: &self.inventory,
            history: &self.story_history,
            turn_count: self.turn_count,
            progression: &self.progression,
            continuation_token: self.continuation_token.as_deref(),
        }
    }

    /// The turn awaiting a player action, if any.
    #[must_use]
    pub fn pending_turn(&self) -> Option<&StoryTurn> {
        self.story_history.last().filter(|turn| turn.is_pending())
    }

    /// Choices the player can pick from right now.
    #[must_use]
    pub fn current_choices(&self) -> Vec<String> {
        if self.is_game_over {
            return Vec::new();
        }
        self.pending_turn()
            .map(|turn| turn.choices.clone())
            .unwrap_or_default()
    }

    /// Counts the player action about to be sent to the generator.
    pub fn begin_turn(&mut self) {
        self.turn_count += 1;
    }

    /// Folds a generated turn into the session.
    ///
    /// `player_action` answers the pending turn; `None` for the opening.
    pub fn apply_turn(
        &mut self,
        result: TurnResult,
        player_action: Option<&str>,
        now: DateTime<Utc>,
        turn_budget: u32,
    ) -> TurnOutcome {
        if let Some(action) = player_action {
            if let Some(pending) = self.story_history.last_mut().filter(|t| t.is_pending()) {
                pending.player_action = Some(action.to_owned());
            }
        }
        self.story_history.push(StoryTurn::pending(
            result.narration.clone(),
            result.choices.clone(),
            now,
        ));
        self.continuation_token.clone_from(&result.continuation_token);

        apply_deltas(&mut self.stats, &result.stat_changes);
        // A dead character does not level up, even if the same turn earned the experience.
        let depleted = self.stats.health == 0;
        let leveled_up = !depleted && maybe_level_up(&mut self.stats);

        add_items(&mut self.inventory, &result.items_found);
        remove_items(&mut self.inventory, &result.items_used);

        self.progression.record_turn_result(&result);
        self.progression
            .pace(result.story_arc, self.turn_count, turn_budget);

        if !self.is_game_over && (result.is_game_over || depleted) {
            self.is_game_over = true;
            self.game_over_reason = Some(self.game_over_reason_for(&result));
        }

        let TurnResult {
            narration,
            choices,
            stat_changes,
            items_found,
            items_used,
            achievements,
            ..
        } = result;
        TurnOutcome {
            narration,
            choices: if self.is_game_over { Vec::new() } else { choices },
            stat_changes,
            items_found,
            items_used,
            new_achievements: achievements,
            leveled_up,
        }
    }

    fn game_over_reason_for(&self, result: &TurnResult) -> String {
        match result.game_over_reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => reason.to_owned(),
            _ if self.stats.health == 0 => HEALTH_DEPLETED_REASON.to_owned(),
            _ => DEFAULT_GAME_OVER_REASON.to_owned(),
        }
    }
}
