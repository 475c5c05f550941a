use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable the original frontend setup uses for its origin.
pub const FRONT_URL_ENV: &str = "FRONT_URL";

/// Load configuration from file with environment variable overrides
///
/// `BAZAAR_SERVER__PORT=9100` overrides `server.port`. A non-empty
/// `FRONT_URL` replaces the configured CORS origins.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let mut config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("BAZAAR_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    apply_front_url(&mut config, std::env::var(FRONT_URL_ENV).ok());

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn apply_front_url(config: &mut Config, front_url: Option<String>) {
    if let Some(url) = front_url.filter(|url| !url.trim().is_empty()) {
        config.cors.allowed_origins = vec![url.trim().to_string()];
    }
}
