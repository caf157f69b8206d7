//! Narrative generator backed by the Azure OpenAI Responses API.

mod generator;
mod wire;

pub use generator::{AzureOpenAiConfig, AzureOpenAiGenerator};
