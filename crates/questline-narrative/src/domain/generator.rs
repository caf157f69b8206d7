//! Contract with the external narrative generator.
//!
//! The generator is a black box that turns a [`GenerationRequest`] into a
//! [`TurnResult`]. Payloads are validated on receipt so the session engine
//! never has to trust field presence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use questline_core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::progression::{RelationshipLevel, StoryArc};
use super::themes::Theme;

/// Failures reported by a narrative generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The continuation token is unknown or expired on the generator side.
    #[error("continuation token is unknown or expired")]
    ContinuationExpired,

    /// The generator answered, but not with a usable turn.
    #[error("malformed turn payload: {0}")]
    Malformed(String),

    /// The generator did not answer in time.
    #[error("generation timed out")]
    Timeout,

    /// Transport or upstream failure.
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

impl From<GeneratorError> for DomainError {
    fn from(err: GeneratorError) -> Self {
        Self::Generation(err.to_string())
    }
}

/// Who is speaking in a forwarded context turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextRole {
    /// A previous narration, replayed as the generator's own output.
    Narrator,
    /// A previous player action.
    Player,
    /// Synthetic recap of turns that fell out of the verbatim window.
    Summary,
}

/// A single forwarded history message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextTurn {
    /// Speaker.
    pub role: ContextRole,
    /// Message body.
    pub content: String,
}

/// How prior story context reaches the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationContext {
    /// The generator resumes from its own retained context.
    Continuation {
        /// Opaque handle from the previous turn.
        token: String,
    },
    /// Prior turns are resent, oldest first.
    Transcript {
        /// Summary (if any) followed by the verbatim window.
        turns: Vec<ContextTurn>,
    },
}

/// Everything the generator needs to produce the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Session setting.
    pub theme: Theme,
    /// System-level instructions, including the response contract.
    pub instructions: String,
    /// Prior context, either by token or by transcript.
    pub context: GenerationContext,
    /// The message for this turn: the player's action plus a status line.
    pub prompt: String,
    /// The raw player action; `None` for the opening turn.
    pub player_action: Option<String>,
}

impl GenerationRequest {
    /// The continuation token, when the request is in continuation mode.
    #[must_use]
    pub fn continuation_token(&self) -> Option<&str> {
        match &self.context {
            GenerationContext::Continuation { token } => Some(token),
            GenerationContext::Transcript { .. } => None,
        }
    }
}

/// A generated turn as returned by the narrative generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    /// Narrative text.
    pub narration: String,
    /// Choices for the player; empty once the game is over.
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<String>,
    /// Signed stat deltas keyed by stat name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stat_changes: BTreeMap<String, i64>,
    /// Items gained this turn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items_found: Vec<String>,
    /// Items consumed this turn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items_used: Vec<String>,
    /// Achievements unlocked this turn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
    /// A pivotal decision worth remembering.
    #[serde(default)]
    pub major_choice: Option<String>,
    /// Relationship updates, overwriting previous standings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: BTreeMap<String, RelationshipLevel>,
    /// The generator's view of the current phase.
    #[serde(default)]
    pub story_arc: Option<StoryArc>,
    /// Whether the story ended this turn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_game_over: bool,
    /// Why the story ended.
    #[serde(default)]
    pub game_over_reason: Option<String>,
    /// Handle for resuming generator-side context next turn.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl TurnResult {
    /// Parses and validates a raw generator payload.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Malformed` if the payload is not JSON, does
    /// not match the schema, or fails [`TurnResult::validate`].
    pub fn from_json(raw: &str) -> Result<Self, GeneratorError> {
        let result: Self = serde_json::from_str(raw.trim())
            .map_err(|e| GeneratorError::Malformed(format!("invalid turn JSON: {e}")))?;
        result.validate()?;
        Ok(result)
    }

    /// Checks the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Malformed` when the narration is blank or a
    /// live game offers no choices.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.narration.trim().is_empty() {
            return Err(GeneratorError::Malformed("narration is empty".into()));
        }
        if !self.is_game_over && self.choices.iter().all(|c| c.trim().is_empty()) {
            return Err(GeneratorError::Malformed(
                "no choices offered for a game in progress".into(),
            ));
        }
        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The external narrative generator.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Produces the next turn.
    ///
    /// Implementations report an unknown or expired continuation token as
    /// [`GeneratorError::ContinuationExpired`] so the caller can retry once
    /// with a full transcript.
    async fn generate(&self, request: &GenerationRequest) -> Result<TurnResult, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_parses_full_payload() {
        // Arrange
        let raw = r#"{
            "narration": "The gate creaks open.",
            "choices": ["Enter", "Wait", "Leave"],
            "statChanges": {"health": -5, "experience": 20},
            "itemsFound": ["Rusty Dagger"],
            "itemsUsed": [],
            "achievements": ["Gatecrasher"],
            "majorChoice": "Entered the keep",
            "relationships": {"Gatekeeper": "suspicious"},
            "storyArc": "rising",
            "isGameOver": false,
            "gameOverReason": null
        }"#;

        // Act
        let result = TurnResult::from_json(raw).unwrap();

        // Assert
        assert_eq!(result.choices.len(), 3);
        assert_eq!(result.stat_changes["health"], -5);
        assert_eq!(result.items_found, vec!["Rusty Dagger"]);
        assert_eq!(result.major_choice.as_deref(), Some("Entered the keep"));
        assert_eq!(
            result.relationships["Gatekeeper"],
            RelationshipLevel::Suspicious
        );
        assert_eq!(result.story_arc, Some(StoryArc::Rising));
        assert!(!result.is_game_over);
        assert!(result.continuation_token.is_none());
    }

    #[test]
    fn test_from_json_defaults_missing_and_null_optionals() {
        let raw = r#"{"narration": "Quiet night.", "choices": ["Sleep"], "itemsFound": null, "isGameOver": null}"#;

        let result = TurnResult::from_json(raw).unwrap();

        assert!(result.items_found.is_empty());
        assert!(result.stat_changes.is_empty());
        assert!(!result.is_game_over);
        assert!(result.story_arc.is_none());
    }

    #[test]
    fn test_from_json_rejects_non_json() {
        assert!(matches!(
            TurnResult::from_json("Once upon a time..."),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_relationship_level() {
        let raw = r#"{"narration": "x", "choices": ["a"], "relationships": {"Bob": "besties"}}"#;

        assert!(matches!(
            TurnResult::from_json(raw),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_narration() {
        let raw = r#"{"narration": "  ", "choices": ["a"]}"#;

        assert!(matches!(
            TurnResult::from_json(raw),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_requires_choices_only_while_game_continues() {
        let live = r#"{"narration": "x", "choices": []}"#;
        let over = r#"{"narration": "You fall.", "choices": [], "isGameOver": true}"#;

        assert!(TurnResult::from_json(live).is_err());
        assert!(TurnResult::from_json(over).is_ok());
    }

    #[test]
    fn test_generator_error_maps_to_generation_domain_error() {
        let err: DomainError = GeneratorError::Timeout.into();

        assert!(matches!(err, DomainError::Generation(msg) if msg == "generation timed out"));
    }
}
