//! Questline: Character bounded context.
//!
//! Owns the character's numeric stats (with level-dependent caps and
//! leveling) and the item ledger. Everything here is a pure function over
//! plain data; the session context decides when to call it.

pub mod domain;
