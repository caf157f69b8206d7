//! Story history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One narration + choices exchange, paired with the player's answer once
/// it arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryTurn {
    /// Narrative text for this turn.
    pub narration: String,
    /// Choices offered to the player.
    pub choices: Vec<String>,
    /// The player's response; `None` while the turn is pending.
    pub player_action: Option<String>,
    /// When the turn was generated.
    pub timestamp: DateTime<Utc>,
}

impl StoryTurn {
    /// Creates a pending turn.
    #[must_use]
    pub fn pending(narration: String, choices: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            narration,
            choices,
            player_action: None,
            timestamp,
        }
    }

    /// Returns `true` while the player has not answered this turn.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.player_action.is_none()
    }
}
