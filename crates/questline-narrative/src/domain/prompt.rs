//! Prompt text sent to the narrative generator.

use questline_character::domain::stats::{health_cap, mana_cap};

use super::context_window::NarrativeContext;
use super::progression::{derive_phase, is_ending_window, progress_percent};
use super::themes::Theme;

const RECENT_MILESTONES: usize = 3;

const RESPONSE_CONTRACT: &str = r#"RESPONSE FORMAT - reply with a single JSON object and nothing else:
{
  "narration": "2-3 short paragraphs of story text",
  "choices": ["First option", "Second option", "Third option", "Optional fourth option"],
  "statChanges": {"health": 0, "mana": 0, "strength": 0, "intelligence": 0, "charisma": 0, "experience": 0},
  "itemsFound": [],
  "itemsUsed": [],
  "achievements": [],
  "majorChoice": null,
  "relationships": {},
  "storyArc": "beginning",
  "isGameOver": false,
  "gameOverReason": null
}

FIELD RULES:
- statChanges are signed deltas caused by this turn; use 0 when nothing changed. Award experience for progress.
- itemsFound lists items the character picked up or received. Use specific names.
- itemsUsed lists items consumed or spent this turn. They are removed by exact name, so reuse the name the item was found under.
- achievements lists milestones unlocked this turn (usually empty).
- majorChoice names a pivotal decision the player just made, otherwise null.
- relationships maps an NPC or faction to one of: allied, friendly, neutral, suspicious, hostile, enemy. Include only changes.
- storyArc is one of: beginning, rising, climax, resolution, ending.
- When the character dies or the story concludes, set isGameOver to true, give a gameOverReason, and return an empty choices array."#;

/// System instructions for a session.
#[must_use]
pub fn system_instructions(theme: Theme, character_name: &str) -> String {
    format!(
        "You are an expert Dungeon Master running an interactive role-playing adventure set in {setting}. \
The player character is named {character_name}.

STORYTELLING:
- Write clear, concrete scenes that are easy to picture. Describe one scene at a time.
- Use simple, direct sentences and natural dialogue. Avoid abstract imagery.
- Build tension through clear cause and effect, and remember earlier events.
- Offer exactly 3 or 4 meaningful choices, each leading somewhere different.
- Let the character grow: show small moments of courage, wisdom, or compassion.
- Make NPC relationships matter and reward thoughtful choices.
- Pace the story to the phase given in each status line.

STATS:
- Health decides survival in fights and dangers. Reaching 0 health ends the game.
- Mana fuels magic and special abilities.
- Strength covers physical feats, intelligence covers puzzles and lore, charisma covers persuasion.
- Judge outcomes against the character's stats.

{RESPONSE_CONTRACT}",
        setting = theme.setting(),
    )
}

/// Compact one-screen summary of the character and story progress.
#[must_use]
pub fn status_line(ctx: &NarrativeContext<'_>, turn_budget: u32) -> String {
    let stats = ctx.stats;
    let mut line = format!(
        "Turn {turn}/{turn_budget} ({progress:.0}% of the story) | Phase: {phase} | \
Level {level} (XP {xp}/{threshold}) | Health {health}/{health_cap} | Mana {mana}/{mana_cap} | \
Strength {strength} | Intelligence {intelligence} | Charisma {charisma}",
        turn = ctx.turn_count,
        progress = progress_percent(ctx.turn_count, turn_budget),
        phase = ctx.progression.story_arc.as_str(),
        level = stats.level,
        xp = stats.experience,
        threshold = stats.experience_threshold(),
        health = stats.health,
        health_cap = health_cap(stats.level),
        mana = stats.mana,
        mana_cap = mana_cap(stats.level),
        strength = stats.strength,
        intelligence = stats.intelligence,
        charisma = stats.charisma,
    );

    if ctx.inventory.is_empty() {
        line.push_str("\nInventory: empty");
    } else {
        line.push_str(&format!("\nInventory: {}", ctx.inventory.join(", ")));
    }

    let achievements = ctx.progression.recent_achievements(RECENT_MILESTONES);
    if !achievements.is_empty() {
        line.push_str(&format!("\nRecent achievements: {}", achievements.join(", ")));
    }

    let choices = ctx.progression.recent_major_choices(RECENT_MILESTONES);
    if !choices.is_empty() {
        line.push_str(&format!("\nRecent major choices: {}", choices.join("; ")));
    }

    if !ctx.progression.relationships.is_empty() {
        let relationships: Vec<String> = ctx
            .progression
            .relationships
            .iter()
            .map(|(name, level)| format!("{name} ({})", level.as_str()))
            .collect();
        line.push_str(&format!("\nRelationships: {}", relationships.join(", ")));
    }

    line
}

/// The per-turn message: the player's action (or the opening request), the
/// status line, and pacing guidance.
#[must_use]
pub fn turn_prompt(ctx: &NarrativeContext<'_>, player_action: Option<&str>, turn_budget: u32) -> String {
    let mut prompt = match player_action {
        None => String::from(
            "Begin the adventure! Create a simple, easy-to-visualize opening scene that introduces \
the character's starting point and hints at their potential for growth.",
        ),
        Some(action) => format!(
            "Player Action: {action}\n\nContinue the story based on this action. Show one scene at a time. \
If the character succeeds, show a small moment of growth or confidence."
        ),
    };

    prompt.push_str(&format!(
        "\n\nCurrent Status:\n{}\n\nSuggested phase for this turn: {}.",
        status_line(ctx, turn_budget),
        derive_phase(ctx.turn_count, turn_budget).as_str(),
    ));

    if is_ending_window(ctx.turn_count, turn_budget) {
        prompt.push_str(
            "\nThe story has reached its planned length. Steer toward a satisfying conclusion \
and set isGameOver to true when it ends.",
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use questline_character::domain::stats::CharacterStats;

    use super::*;
    use crate::domain::progression::{Progression, RelationshipLevel, StoryArc};

    fn ctx<'a>(
        stats: &'a CharacterStats,
        progression: &'a Progression,
        inventory: &'a [String],
        turn_count: u32,
    ) -> NarrativeContext<'a> {
        NarrativeContext {
            theme: Theme::Cyberpunk,
            character_name: "Nyx",
            stats,
            inventory,
            history: &[],
            turn_count,
            progression,
            continuation_token: None,
        }
    }

    #[test]
    fn test_system_instructions_mention_setting_and_name() {
        let text = system_instructions(Theme::Cyberpunk, "Nyx");

        assert!(text.contains("megacorporations"));
        assert!(text.contains("Nyx"));
        assert!(text.contains("\"isGameOver\""));
    }

    #[test]
    fn test_status_line_includes_stats_and_milestones() {
        // Arrange
        let stats = CharacterStats {
            level: 2,
            experience: 40,
            ..CharacterStats::default()
        };
        let mut progression = Progression {
            achievements: vec!["a1".into(), "a2".into(), "a3".into(), "a4".into()],
            major_choices: vec!["Joined the rebels".into()],
            story_arc: StoryArc::Rising,
            ..Progression::default()
        };
        progression
            .relationships
            .insert("Fixer".into(), RelationshipLevel::Friendly);
        let inventory = vec!["Deck".to_owned()];

        // Act
        let line = status_line(&ctx(&stats, &progression, &inventory, 90), 450);

        // Assert
        assert!(line.starts_with("Turn 90/450 (20% of the story) | Phase: rising"));
        assert!(line.contains("Level 2 (XP 40/200)"));
        assert!(line.contains("Health 100/120"));
        assert!(line.contains("Inventory: Deck"));
        assert!(line.contains("Recent achievements: a2, a3, a4"));
        assert!(line.contains("Recent major choices: Joined the rebels"));
        assert!(line.contains("Relationships: Fixer (friendly)"));
    }

    #[test]
    fn test_status_line_for_fresh_character_has_no_milestone_lines() {
        let stats = CharacterStats::default();
        let progression = Progression::default();

        let line = status_line(&ctx(&stats, &progression, &[], 0), 450);

        assert_eq!(line.lines().count(), 2);
        assert!(line.ends_with("\nInventory: empty"));
        assert!(!line.contains("Recent achievements"));
        assert!(!line.contains("Relationships"));
    }

    #[test]
    fn test_turn_prompt_carries_status_and_suggested_phase() {
        let stats = CharacterStats::default();
        let progression = Progression::default();

        let prompt = turn_prompt(&ctx(&stats, &progression, &[], 300), Some("Run"), 450);

        assert!(prompt.contains("\n\nCurrent Status:\nTurn 300/450"));
        assert!(prompt.contains("Suggested phase for this turn: climax."));
    }

    #[test]
    fn test_turn_prompt_opening_vs_action() {
        let stats = CharacterStats::default();
        let progression = Progression::default();
        let context = ctx(&stats, &progression, &[], 0);

        assert!(turn_prompt(&context, None, 450).starts_with("Begin the adventure!"));
        assert!(turn_prompt(&context, Some("Hack the door"), 450).starts_with("Player Action: Hack the door"));
    }

    #[test]
    fn test_turn_prompt_flags_ending_window() {
        let stats = CharacterStats::default();
        let progression = Progression::default();

        let before = turn_prompt(&ctx(&stats, &progression, &[], 449), Some("Wait"), 450);
        let after = turn_prompt(&ctx(&stats, &progression, &[], 450), Some("Wait"), 450);

        assert!(!before.contains("planned length"));
        assert!(after.contains("planned length"));
    }
}
