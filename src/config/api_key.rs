use crate::config::harness_config::ApiConfig;
use crate::utils::error::{ProbeError, Result};
use std::path::Path;
use tracing::debug;

/// Loads the API key: the key file first, then the configured environment
/// variable as a fallback. The key's value is never logged.
pub fn load_api_key(config: &ApiConfig) -> Result<String> {
    let path = Path::new(&config.key_file);

    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let key = contents.trim();
        if key.is_empty() {
            return Err(ProbeError::ConfigValidationError {
                field: "api.key_file".to_string(),
                message: format!("key file '{}' is empty", config.key_file),
            });
        }
        debug!("🔑 API key loaded from file: {}", config.key_file);
        return Ok(key.to_string());
    }

    if let Ok(value) = std::env::var(&config.key_env) {
        let key = value.trim();
        if !key.is_empty() {
            debug!("🔑 API key loaded from environment: {}", config.key_env);
            return Ok(key.to_string());
        }
    }

    Err(ProbeError::MissingConfigError {
        field: format!(
            "API key (file '{}' or environment variable '{}')",
            config.key_file, config.key_env
        ),
    })
}
