//! Canned values shared across test suites.

use chrono::{DateTime, TimeZone, Utc};
use questline_narrative::domain::generator::TurnResult;

/// Fixed timestamp used across tests.
///
/// # Panics
///
/// Never; the date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A live turn with the given narration and choices and no side effects.
#[must_use]
pub fn turn_result(narration: &str, choices: &[&str]) -> TurnResult {
    TurnResult {
        narration: narration.to_owned(),
        choices: choices.iter().map(|c| (*c).to_owned()).collect(),
        ..TurnResult::default()
    }
}

/// A turn that ends the game with `reason`.
#[must_use]
pub fn game_over_turn(narration: &str, reason: &str) -> TurnResult {
    TurnResult {
        narration: narration.to_owned(),
        is_game_over: true,
        game_over_reason: Some(reason.to_owned()),
        ..TurnResult::default()
    }
}
