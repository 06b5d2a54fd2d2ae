use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let prefix = &config.identifier.prefix;
    if prefix.is_empty() {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.clone(),
            reason: "Prefix must not be empty".to_string(),
        });
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.clone(),
            reason: "Prefix may only contain ASCII letters, digits and underscores".to_string(),
        });
    }

    if config.identifier.version_marker.is_empty() {
        return Err(ConfigError::Validation {
            message: "identifier.version_marker must not be empty".to_string(),
        });
    }

    if config.extensions.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one extension pattern is required".to_string(),
        });
    }
    for pattern in &config.extensions {
        glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidExtensionPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
    }

    let layout = &config.layout;
    for (field, value) in [
        ("layout.input_subdir", &layout.input_subdir),
        ("layout.output_subdir", &layout.output_subdir),
        ("layout.error_subdir", &layout.error_subdir),
    ] {
        validate_subdir(field, value)?;
    }

    Ok(())
}

fn validate_subdir(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: format!("{} must not be empty", field),
        });
    }
    if Path::new(value).is_absolute() {
        return Err(ConfigError::Validation {
            message: format!("{} must be relative to the project folder: {}", field, value),
        });
    }
    if value.contains("..") {
        return Err(ConfigError::Validation {
            message: format!("{} contains path traversal: {}", field, value),
        });
    }
    Ok(())
}
