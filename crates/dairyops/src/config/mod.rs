pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, default_config_path, load_config, load_config_from_env,
    load_config_from_str, API_URL_ENV, LOG_ENV,
};
pub use schema::{ApiSettings, CacheSettings, ClientConfig, FormSettings, LoggingSettings};
