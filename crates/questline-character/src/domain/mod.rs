//! Domain model for the Character context.

pub mod inventory;
pub mod stats;
