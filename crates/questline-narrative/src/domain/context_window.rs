//! Context window management.
//!
//! Decides which part of the story history is forwarded to the generator.
//! When the generator holds the context itself (a continuation token is
//! available) no history is resent. Otherwise the last few turns go out
//! verbatim and everything older is folded into one summary turn.

use questline_character::domain::stats::CharacterStats;
use serde_json::json;
use tracing::debug;

use super::generator::{ContextRole, ContextTurn, GenerationContext, GenerationRequest};
use super::progression::{DEFAULT_TURN_BUDGET, Progression};
use super::prompt;
use super::story::StoryTurn;
use super::themes::Theme;

/// Number of most recent turns sent verbatim.
pub const DEFAULT_VERBATIM_TURNS: usize = 3;

/// Maximum number of older player actions mentioned in the summary.
pub const DEFAULT_SUMMARY_ACTIONS: usize = 5;

/// Summary used when the collapsed turns contain no player actions.
pub const OPENING_SUMMARY: &str = "The story started with an introduction to the world.";

/// Tuning for context assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Turns forwarded verbatim.
    pub verbatim_turns: usize,
    /// Player actions kept in the summary.
    pub summary_actions: usize,
    /// Turn budget used for pacing hints.
    pub turn_budget: u32,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            verbatim_turns: DEFAULT_VERBATIM_TURNS,
            summary_actions: DEFAULT_SUMMARY_ACTIONS,
            turn_budget: DEFAULT_TURN_BUDGET,
        }
    }
}

/// The slice of history chosen for a transcript-mode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow<'a> {
    /// Recap of the collapsed turns, present only when some were collapsed.
    pub summary: Option<String>,
    /// The most recent turns, oldest first.
    pub verbatim: &'a [StoryTurn],
}

impl ContextWindow<'_> {
    /// Flattens the window into alternating narrator/player messages, led by
    /// the summary when there is one.
    #[must_use]
    pub fn into_turns(self) -> Vec<ContextTurn> {
        let mut turns = Vec::with_capacity(self.verbatim.len() * 2 + 1);
        if let Some(summary) = self.summary {
            turns.push(ContextTurn {
                role: ContextRole::Summary,
                content: summary,
            });
        }
        for entry in self.verbatim {
            turns.push(ContextTurn {
                role: ContextRole::Narrator,
                content: json!({
                    "narration": entry.narration,
                    "choices": entry.choices,
                })
                .to_string(),
            });
            if let Some(action) = &entry.player_action {
                turns.push(ContextTurn {
                    role: ContextRole::Player,
                    content: format!("Player chose: {action}"),
                });
            }
        }
        turns
    }
}

/// Splits `history` into a summary of older turns and a verbatim tail.
#[must_use]
pub fn select_window<'a>(history: &'a [StoryTurn], policy: &WindowPolicy) -> ContextWindow<'a> {
    if history.len() <= policy.verbatim_turns {
        return ContextWindow {
            summary: None,
            verbatim: history,
        };
    }
    let (collapsed, verbatim) = history.split_at(history.len() - policy.verbatim_turns);
    ContextWindow {
        summary: Some(summarize(collapsed, policy.summary_actions)),
        verbatim,
    }
}

/// One-sentence recap built from the last `limit` player actions.
#[must_use]
pub fn summarize(collapsed: &[StoryTurn], limit: usize) -> String {
    let actions: Vec<&str> = collapsed
        .iter()
        .filter_map(|turn| turn.player_action.as_deref())
        .collect();
    let recent = &actions[actions.len().saturating_sub(limit)..];
    if recent.is_empty() {
        return OPENING_SUMMARY.to_owned();
    }
    format!("Earlier in the adventure: {}.", recent.join("; then "))
}

/// Read-only snapshot of the session state that shapes a request.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    /// Session setting.
    pub theme: Theme,
    /// Player character's name.
    pub character_name: &'a str,
    /// Current stats.
    pub stats: &'a CharacterStats,
    /// Items held.
    pub inventory: &'a [String],
    /// Full story history, oldest first.
    pub history: &'a [StoryTurn],
    /// Turns taken so far, including the one being requested.
    pub turn_count: u32,
    /// Accumulated milestones.
    pub progression: &'a Progression,
    /// Generator-side context handle, if one is held.
    pub continuation_token: Option<&'a str>,
}

/// Builds the outbound request for the next turn.
///
/// Continuation mode is used whenever a token is present; the transcript
/// (summary plus verbatim window) is the fallback.
#[must_use]
pub fn build_request(
    ctx: &NarrativeContext<'_>,
    player_action: Option<&str>,
    policy: &WindowPolicy,
) -> GenerationRequest {
    let context = match ctx.continuation_token {
        Some(token) => GenerationContext::Continuation {
            token: token.to_owned(),
        },
        None => {
            let window = select_window(ctx.history, policy);
            debug!(
                verbatim_turns = window.verbatim.len(),
                summarized = window.summary.is_some(),
                "no continuation token; sending transcript"
            );
            GenerationContext::Transcript {
                turns: window.into_turns(),
            }
        }
    };

    GenerationRequest {
        theme: ctx.theme,
        instructions: prompt::system_instructions(ctx.theme, ctx.character_name),
        context,
        prompt: prompt::turn_prompt(ctx, player_action, policy.turn_budget),
        player_action: player_action.map(str::to_owned),
    }
}
