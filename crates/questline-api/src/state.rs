//! Shared application state.

use questline_session::application::services::SessionServices;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session engine dependencies.
    pub services: SessionServices,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(services: SessionServices) -> Self {
        Self { services }
    }
}
