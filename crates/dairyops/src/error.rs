use std::path::PathBuf;
use thiserror::Error;

pub use crate::api::ApiError;
pub use crate::store::{CoordinatorError, StoreError};
pub use crate::wizard::WizardError;

#[derive(Error, Debug)]
pub enum DairyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Form error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Workflow error: {0}")]
    Coordinator(#[from] CoordinatorError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("No API base URL configured (set api.base_url or DAIRYOPS_API_URL)")]
    MissingBaseUrl,

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, DairyError>;
