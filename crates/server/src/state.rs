use reelscout_core::{Config, SanitizedConfig, SearchCoordinator};

/// Shared application state
pub struct AppState {
    config: Config,
    coordinator: SearchCoordinator,
}

impl AppState {
    pub fn new(config: Config, coordinator: SearchCoordinator) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn coordinator(&self) -> &SearchCoordinator {
        &self.coordinator
    }
}
