//! Domain model for the Narrative context.

pub mod context_window;
pub mod generator;
pub mod progression;
pub mod prompt;
pub mod story;
pub mod themes;
