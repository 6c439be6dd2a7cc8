//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Apply a bind address override and re-validate the result.
pub fn override_bind_address(mut config: ServerConfig, bind: Option<String>) -> Result<ServerConfig, ConfigError> {
    if let Some(bind) = bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("exchange-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[listener]\nbind_address = \"127.0.0.1:8181\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8181");

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[listener\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_message_lists_errors() {
        let err = parse_config("[timeouts]\nrequest_secs = 0\n[exchange]\nmax_body_bytes = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: exchange.max_body_bytes must be greater than zero, \
             timeouts.request_secs must be greater than zero"
        );
    }

    #[test]
    fn test_bind_override_is_validated() {
        let config = override_bind_address(ServerConfig::default(), Some("127.0.0.1:9191".into())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9191");

        let err = override_bind_address(ServerConfig::default(), Some("not-an-address".into())).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::BindAddress("not-an-address".into())]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let untouched = override_bind_address(ServerConfig::default(), None).unwrap();
        assert_eq!(untouched.listener.bind_address, ServerConfig::default().listener.bind_address);
    }
}
