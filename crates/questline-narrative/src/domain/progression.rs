//! Progression tracking: story-arc pacing and accumulated milestones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::generator::TurnResult;

/// Default number of player turns a story is paced to run.
pub const DEFAULT_TURN_BUDGET: u32 = 450;

/// Coarse narrative stage used to pace tone and ending likelihood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryArc {
    /// Introduction to the world.
    #[default]
    Beginning,
    /// Stakes and complications build.
    Rising,
    /// The central confrontation.
    Climax,
    /// Loose ends are tied up.
    Resolution,
    /// The story concludes.
    Ending,
}

impl StoryArc {
    /// Wire name of the phase.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginning => "beginning",
            Self::Rising => "rising",
            Self::Climax => "climax",
            Self::Resolution => "resolution",
            Self::Ending => "ending",
        }
    }
}

/// How an NPC or faction regards the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipLevel {
    /// Fights alongside the player.
    Allied,
    /// Well disposed.
    Friendly,
    /// No opinion yet.
    Neutral,
    /// Distrustful.
    Suspicious,
    /// Openly unfriendly.
    Hostile,
    /// Actively working against the player.
    Enemy,
}

impl RelationshipLevel {
    /// Wire name of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allied => "allied",
            Self::Friendly => "friendly",
            Self::Neutral => "neutral",
            Self::Suspicious => "suspicious",
            Self::Hostile => "hostile",
            Self::Enemy => "enemy",
        }
    }
}

/// Percentage of the turn budget consumed, capped at 100.
#[must_use]
pub fn progress_percent(turn_count: u32, turn_budget: u32) -> f64 {
    if turn_budget == 0 {
        return 100.0;
    }
    (f64::from(turn_count) / f64::from(turn_budget) * 100.0).min(100.0)
}

/// Derives the expected story phase from how far through the budget we are.
#[must_use]
pub fn derive_phase(turn_count: u32, turn_budget: u32) -> StoryArc {
    let progress = progress_percent(turn_count, turn_budget);
    if progress < 20.0 {
        StoryArc::Beginning
    } else if progress < 50.0 {
        StoryArc::Rising
    } else if progress < 75.0 {
        StoryArc::Climax
    } else if progress < 95.0 {
        StoryArc::Resolution
    } else {
        StoryArc::Ending
    }
}

/// Whether the turn budget has been reached and a conclusion is expected.
///
/// Informational only; it never ends the game by itself.
#[must_use]
pub fn is_ending_window(turn_count: u32, turn_budget: u32) -> bool {
    turn_count >= turn_budget
}

/// Milestones accumulated over a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    /// Append-only achievement log; duplicates are kept.
    pub achievements: Vec<String>,
    /// Append-only log of pivotal decisions.
    pub major_choices: Vec<String>,
    /// Latest standing with each NPC or faction.
    pub relationships: BTreeMap<String, RelationshipLevel>,
    /// Current narrative phase.
    pub story_arc: StoryArc,
}

impl Progression {
    /// Folds a generated turn's milestones into the running totals.
    ///
    /// The generator's `story_arc` wins when supplied; otherwise the arc is
    /// left for [`Progression::pace`] to derive.
    pub fn record_turn_result(&mut self, result: &TurnResult) {
        self.achievements.extend(result.achievements.iter().cloned());
        if let Some(choice) = result.major_choice.as_ref().filter(|c| !c.trim().is_empty()) {
            self.major_choices.push(choice.clone());
        }
        for (name, level) in &result.relationships {
            self.relationships.insert(name.clone(), *level);
        }
        if let Some(arc) = result.story_arc {
            self.story_arc = arc;
        }
    }

    /// Sets the arc from the turn count when the generator did not supply one.
    pub fn pace(&mut self, supplied: Option<StoryArc>, turn_count: u32, turn_budget: u32) {
        if supplied.is_none() {
            self.story_arc = derive_phase(turn_count, turn_budget);
        }
    }

    /// The most recent `n` achievements, oldest first.
    #[must_use]
    pub fn recent_achievements(&self, n: usize) -> &[String] {
        tail(&self.achievements, n)
    }

    /// The most recent `n` major choices, oldest first.
    #[must_use]
    pub fn recent_major_choices(&self, n: usize) -> &[String] {
        tail(&self.major_choices, n)
    }
}

fn tail(items: &[String], n: usize) -> &[String] {
    &items[items.len().saturating_sub(n)..]
}
