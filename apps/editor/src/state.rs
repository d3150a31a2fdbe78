use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The editing core keeps no server-side sessions: every request carries the
/// document it operates on.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
