//! Shared test mocks and utilities for the Questline narrative RPG engine.

mod clock;
mod fixtures;
mod generator;

pub use clock::{AdjustableClock, FixedClock};
pub use fixtures::{fixed_now, game_over_turn, turn_result};
pub use generator::{FailingGenerator, ScriptedGenerator};
