//! Route modules.

pub mod game;
pub mod health;
