use std::path::{Path, PathBuf};

use crate::config::schema::ClientConfig;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/client-config-v1.json");

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "DAIRYOPS_API_URL";

/// Environment variable overriding `logging.level`.
pub const LOG_ENV: &str = "DAIRYOPS_LOG";

/// Location of the config file in the user's config directory, if one exists for the platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dairyops").join("config.json"))
}

/// Reads a config file, applies environment overrides and validates the result.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let json_value: serde_json::Value = serde_json::from_str(&content)?;
    validate_schema(&json_value)?;

    let mut config: ClientConfig = serde_json::from_value(json_value)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;

    log::debug!("Loaded client config from {}", path.display());
    Ok(config)
}

pub fn load_config_from_str(content: &str) -> Result<ClientConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: ClientConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Builds a config purely from the environment (`DAIRYOPS_API_URL` is required).
pub fn load_config_from_env() -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::with_base_url(String::new());
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

pub fn apply_env_overrides(config: &mut ClientConfig) {
    if let Some(url) = non_empty_env(API_URL_ENV) {
        log::debug!("Using API base URL from {}", API_URL_ENV);
        config.api.base_url = url;
    }
    if let Some(level) = non_empty_env(LOG_ENV) {
        config.logging.level = level;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let url = reqwest::Url::parse(&config.api.base_url).map_err(|e| ConfigError::Validation {
        message: format!("Invalid api.base_url '{}': {}", config.api.base_url, e),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            message: format!("api.base_url must use http or https, got '{}'", url.scheme()),
        });
    }

    if config.api.connect_timeout_secs == 0 || config.api.request_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "API timeouts must be greater than zero".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "api": { "base_url": "https://plant.example.com/api" },
            "cache": { "fetch_window_ms": 2500 }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.api.base_url, "https://plant.example.com/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.cache.fetch_window_ms, 2500);
        assert_eq!(config.forms.refresh_delay_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_version() {
        let config_json = r#"{ "version": "2.0", "api": { "base_url": "http://localhost" } }"#;
        assert!(matches!(
            load_config_from_str(config_json),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let config_json = r#"
        {
            "version": "1.0",
            "api": { "base_url": "http://localhost", "credentials": "include" }
        }
        "#;
        assert!(matches!(
            load_config_from_str(config_json),
            Err(ConfigError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_missing_base_url() {
        let result = load_config_from_str(r#"{ "version": "1.0" }"#);
        assert!(matches!(result, Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn test_non_http_base_url() {
        let result =
            load_config_from_str(r#"{ "version": "1.0", "api": { "base_url": "ftp://x" } }"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_base_url() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "version": "1.0", "api": {{ "base_url": "http://file.local" }} }}"#
        )
        .unwrap();

        std::env::set_var(API_URL_ENV, "http://env.local:8080");
        let config = load_config(file.path());
        std::env::remove_var(API_URL_ENV);

        assert_eq!(config.unwrap().api.base_url, "http://env.local:8080");
    }

    #[test]
    #[serial]
    fn test_load_from_env_requires_url() {
        std::env::remove_var(API_URL_ENV);
        assert!(matches!(
            load_config_from_env(),
            Err(ConfigError::MissingBaseUrl)
        ));

        std::env::set_var(API_URL_ENV, "http://env.local");
        let config = load_config_from_env();
        std::env::remove_var(API_URL_ENV);
        assert_eq!(config.unwrap().api.base_url, "http://env.local");
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/dairyops.json");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
