//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

/// Raw TOML shape — serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub host: RawHost,
    #[serde(default)]
    pub logging: RawLogging,
}

#[derive(Deserialize, Default)]
pub(super) struct RawHost {
    #[serde(default)]
    pub endpoint_name: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub base_dir: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct RawLogging {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}
