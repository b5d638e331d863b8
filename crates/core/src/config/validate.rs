use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Hosted classifier providers have an API key
/// - At least one crisis candidate location is considered
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(ref classifier) = config.classifier {
        let has_key = classifier
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if classifier.provider.requires_api_key() && !has_key {
            return Err(ConfigError::ValidationError(format!(
                "classifier.api_key is required for provider '{}'",
                classifier.provider.as_str()
            )));
        }
        if classifier.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "classifier.model cannot be empty".to_string(),
            ));
        }
    }

    if config.crisis.max_candidates == 0 {
        return Err(ConfigError::ValidationError(
            "crisis.max_candidates must be at least 1".to_string(),
        ));
    }

    Ok(())
}
