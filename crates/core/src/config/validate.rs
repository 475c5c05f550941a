use super::{types::Config, ConfigError};
use crate::images::validate_image_name;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Image directory is set and the default image is a valid image name
/// - Upload limit is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.images.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "images.dir cannot be empty".to_string(),
        ));
    }

    validate_image_name(&config.images.default_image).map_err(|e| {
        ConfigError::ValidationError(format!("images.default_image: {}", e))
    })?;

    if config.images.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "images.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    Ok(())
}
