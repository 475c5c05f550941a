use bazaar_core::{CatalogEngine, Config};

/// Shared application state
pub struct AppState {
    config: Config,
    engine: CatalogEngine,
}

impl AppState {
    pub fn new(config: Config, engine: CatalogEngine) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &CatalogEngine {
        &self.engine
    }
}
