//! Questline: Game Session Progression bounded context.
//!
//! Owns each player's session state and is the only writer of it. A
//! transition asks the narrative generator for the next turn, folds the
//! result through the stat engine, inventory ledger and progression
//! tracker, decides whether the game is over, and commits the new state
//! in one step.

pub mod application;
pub mod domain;
pub mod infrastructure;
