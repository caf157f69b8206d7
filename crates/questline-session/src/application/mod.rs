//! Application layer for the Session context.

pub mod command_handlers;
pub mod expiry;
pub mod locks;
pub mod query_handlers;
pub mod services;
