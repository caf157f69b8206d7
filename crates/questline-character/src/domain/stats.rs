//! Stat engine: delta application, caps, and leveling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ceiling for strength, intelligence and charisma.
pub const ATTRIBUTE_CAP: u32 = 50;

/// Experience required per level before the next level-up.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;

/// Health restored on level-up (before clamping to the new cap).
pub const LEVEL_UP_HEALTH_BONUS: u32 = 20;

/// Mana restored on level-up (before clamping to the new cap).
pub const LEVEL_UP_MANA_BONUS: u32 = 10;

/// A named character stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    /// Hit points; zero ends the game.
    Health,
    /// Magical reserve.
    Mana,
    /// Physical prowess.
    Strength,
    /// Problem solving and magic power.
    Intelligence,
    /// Persuasion and leadership.
    Charisma,
    /// Character level, starting at 1.
    Level,
    /// Experience towards the next level.
    Experience,
}

impl Stat {
    /// Looks up a stat by its wire name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "health" => Some(Self::Health),
            "mana" => Some(Self::Mana),
            "strength" => Some(Self::Strength),
            "intelligence" => Some(Self::Intelligence),
            "charisma" => Some(Self::Charisma),
            "level" => Some(Self::Level),
            "experience" => Some(Self::Experience),
            _ => None,
        }
    }
}

/// The character's numeric state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Current health, bounded by [`health_cap`].
    pub health: u32,
    /// Current mana, bounded by [`mana_cap`].
    pub mana: u32,
    /// Strength, bounded by [`ATTRIBUTE_CAP`].
    pub strength: u32,
    /// Intelligence, bounded by [`ATTRIBUTE_CAP`].
    pub intelligence: u32,
    /// Charisma, bounded by [`ATTRIBUTE_CAP`].
    pub charisma: u32,
    /// Character level.
    pub level: u32,
    /// Experience accumulated in the current level.
    pub experience: u32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            health: 100,
            mana: 50,
            strength: 10,
            intelligence: 10,
            charisma: 10,
            level: 1,
            experience: 0,
        }
    }
}

impl CharacterStats {
    fn slot(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Mana => &mut self.mana,
            Stat::Strength => &mut self.strength,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Charisma => &mut self.charisma,
            Stat::Level => &mut self.level,
            Stat::Experience => &mut self.experience,
        }
    }

    /// Experience needed at the current level to trigger a level-up.
    #[must_use]
    pub fn experience_threshold(&self) -> u32 {
        self.level.saturating_mul(EXPERIENCE_PER_LEVEL)
    }
}

/// Maximum health at `level`.
#[must_use]
pub fn health_cap(level: u32) -> u32 {
    100_u32.saturating_add(20_u32.saturating_mul(level.saturating_sub(1)))
}

/// Maximum mana at `level`.
#[must_use]
pub fn mana_cap(level: u32) -> u32 {
    100_u32.saturating_add(15_u32.saturating_mul(level.saturating_sub(1)))
}

/// Applies generator-supplied deltas, then enforces every cap.
///
/// Unknown stat names are ignored. No stat ever drops below zero.
pub fn apply_deltas(stats: &mut CharacterStats, deltas: &BTreeMap<String, i64>) {
    for (name, delta) in deltas {
        let Some(stat) = Stat::parse(name) else {
            debug!(stat = %name, "ignoring unknown stat delta");
            continue;
        };
        let slot = stats.slot(stat);
        let updated = i64::from(*slot).saturating_add(*delta).max(0);
        *slot = u32::try_from(updated).unwrap_or(u32::MAX);
    }

    stats.health = stats.health.min(health_cap(stats.level));
    stats.mana = stats.mana.min(mana_cap(stats.level));
    stats.strength = stats.strength.min(ATTRIBUTE_CAP);
    stats.intelligence = stats.intelligence.min(ATTRIBUTE_CAP);
    stats.charisma = stats.charisma.min(ATTRIBUTE_CAP);
}

/// Applies at most one level-up when experience has reached the threshold.
///
/// Experience above the threshold carries into the new level. Returns `true`
/// when a level was gained.
pub fn maybe_level_up(stats: &mut CharacterStats) -> bool {
    let threshold = stats.experience_threshold();
    if stats.experience < threshold {
        return false;
    }

    stats.level = stats.level.saturating_add(1);
    stats.experience -= threshold;
    stats.health = stats
        .health
        .saturating_add(LEVEL_UP_HEALTH_BONUS)
        .min(health_cap(stats.level));
    stats.mana = stats
        .mana
        .saturating_add(LEVEL_UP_MANA_BONUS)
        .min(mana_cap(stats.level));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[test]
    fn test_default_stats_match_a_fresh_character() {
        let stats = CharacterStats::default();

        assert_eq!(stats.health, 100);
        assert_eq!(stats.mana, 50);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.experience, 0);
    }

    #[test]
    fn test_caps_grow_with_level() {
        assert_eq!(health_cap(1), 100);
        assert_eq!(health_cap(3), 140);
        assert_eq!(mana_cap(1), 100);
        assert_eq!(mana_cap(3), 130);
        assert_eq!(health_cap(0), 100);
    }

    #[test]
    fn test_apply_deltas_never_goes_negative() {
        // Arrange
        let mut stats = CharacterStats {
            health: 50,
            ..CharacterStats::default()
        };

        // Act
        apply_deltas(
            &mut stats,
            &deltas(&[("health", -150), ("mana", -1000), ("charisma", -11)]),
        );

        // Assert
        assert_eq!(stats.health, 0);
        assert_eq!(stats.mana, 0);
        assert_eq!(stats.charisma, 0);
    }

    #[test]
    fn test_apply_deltas_clamps_to_level_caps() {
        // Arrange
        let mut stats = CharacterStats {
            level: 2,
            ..CharacterStats::default()
        };

        // Act
        apply_deltas(
            &mut stats,
            &deltas(&[("health", 500), ("mana", 500), ("strength", 99)]),
        );

        // Assert
        assert_eq!(stats.health, 120);
        assert_eq!(stats.mana, 115);
        assert_eq!(stats.strength, ATTRIBUTE_CAP);
    }

    #[test]
    fn test_apply_deltas_ignores_unknown_stats() {
        let mut stats = CharacterStats::default();

        apply_deltas(&mut stats, &deltas(&[("luck", 7), ("intelligence", 2)]));

        assert_eq!(
            stats,
            CharacterStats {
                intelligence: 12,
                ..CharacterStats::default()
            }
        );
    }

    #[test]
    fn test_apply_deltas_enforces_caps_for_every_delta_sign() {
        for delta in [-1_000_i64, -101, -1, 0, 1, 37, 101, 10_000, i64::MAX, i64::MIN] {
            let mut stats = CharacterStats::default();
            apply_deltas(
                &mut stats,
                &deltas(&[("health", delta), ("mana", delta), ("strength", delta)]),
            );
            assert!(stats.health <= health_cap(stats.level), "delta {delta}");
            assert!(stats.mana <= mana_cap(stats.level), "delta {delta}");
            assert!(stats.strength <= ATTRIBUTE_CAP, "delta {delta}");
        }
    }

    #[test]
    fn test_maybe_level_up_below_threshold_is_a_no_op() {
        // Arrange
        let mut stats = CharacterStats {
            experience: 99,
            ..CharacterStats::default()
        };
        let before = stats;

        // Act
        let leveled = maybe_level_up(&mut stats);

        // Assert
        assert!(!leveled);
        assert_eq!(stats, before);
    }

    #[test]
    fn test_maybe_level_up_carries_surplus_and_boosts_pools() {
        // Arrange
        let mut stats = CharacterStats {
            health: 95,
            mana: 98,
            experience: 90,
            ..CharacterStats::default()
        };
        apply_deltas(&mut stats, &deltas(&[("experience", 20)]));

        // Act
        let leveled = maybe_level_up(&mut stats);

        // Assert
        assert!(leveled);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.experience, 10);
        assert_eq!(stats.health, 115);
        assert_eq!(stats.mana, 108);
    }

    #[test]
    fn test_maybe_level_up_clamps_pools_to_new_caps() {
        let mut stats = CharacterStats {
            health: 100,
            mana: 100,
            experience: 100,
            ..CharacterStats::default()
        };

        maybe_level_up(&mut stats);

        assert_eq!(stats.experience, 0);
        assert_eq!(stats.health, health_cap(2));
        assert_eq!(stats.mana, mana_cap(2));
    }

    #[test]
    fn test_maybe_level_up_gains_only_one_level_per_call() {
        let mut stats = CharacterStats {
            experience: 1_000,
            ..CharacterStats::default()
        };

        maybe_level_up(&mut stats);

        assert_eq!(stats.level, 2);
        assert_eq!(stats.experience, 900);
    }

    #[test]
    fn test_stats_serialize_with_snake_case_names() {
        let json = serde_json::to_value(CharacterStats::default()).unwrap();
        assert_eq!(json["health"], 100);
        assert_eq!(json["experience"], 0);
    }
}
