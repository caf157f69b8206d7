//! Questline: Narrative Orchestration bounded context.
//!
//! Responsible for the theme catalog, story-arc pacing, the contract with
//! the external narrative generator, and deciding how much story history
//! is forwarded to it on each turn.

pub mod domain;
