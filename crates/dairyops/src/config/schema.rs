use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: String,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub forms: FormSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ClientConfig {
    /// Builds a config pointing at `base_url` with every other setting at its default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            version: "1.0".to_string(),
            api: ApiSettings {
                base_url: base_url.into(),
                ..ApiSettings::default()
            },
            cache: CacheSettings::default(),
            forms: FormSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root URL of the REST backend. Empty means "take it from the environment".
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl ApiSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Window during which a repeated list fetch is served from memory.
    #[serde(default = "default_fetch_window")]
    pub fetch_window_ms: u64,
}

fn default_fetch_window() -> u64 {
    5_000
}

impl CacheSettings {
    pub fn fetch_window(&self) -> Duration {
        Duration::from_millis(self.fetch_window_ms)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            fetch_window_ms: default_fetch_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSettings {
    /// Delay between a successful submission and the list refresh.
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,
    /// How long reference option lookups stay cached.
    #[serde(default = "default_reference_ttl")]
    pub reference_ttl_secs: u64,
}

fn default_refresh_delay() -> u64 {
    1_000
}

fn default_reference_ttl() -> u64 {
    60
}

impl FormSettings {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn reference_ttl(&self) -> Duration {
        Duration::from_secs(self.reference_ttl_secs)
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay(),
            reference_ttl_secs: default_reference_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
