//! Storage adapters for the Session context.

pub mod in_memory_store;
