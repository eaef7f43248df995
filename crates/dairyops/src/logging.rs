//! Logging setup for applications embedding the crate.
//!
//! Library code logs through the `log` facade and `tracing` spans. This installs a
//! `tracing-subscriber` registry as the global subscriber and bridges `log` records
//! into it.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LoggingSettings, LOG_ENV};
use crate::error::ConfigError;

/// Builds the env filter, preferring `DAIRYOPS_LOG` over the configured level.
fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, ConfigError> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| ConfigError::Logging(format!("invalid level '{}': {}", settings.level, e))),
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), ConfigError> {
    let filter = build_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if settings.json {
        tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))
    } else {
        tracing::subscriber::set_global_default(registry.with(fmt::layer()))
    };
    installed.map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing_log::LogTracer::init().map_err(|e| ConfigError::Logging(e.to_string()))?;

    log::info!("Logging initialized at level '{}'", settings.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        let settings = LoggingSettings {
            level: "dairyops=notalevel".to_string(),
            json: false,
        };
        if std::env::var(LOG_ENV).is_err() {
            assert!(matches!(build_filter(&settings), Err(ConfigError::Logging(_))));
        }
    }

    #[test]
    fn test_default_level_parses() {
        assert!(build_filter(&LoggingSettings::default()).is_ok());
    }
}
