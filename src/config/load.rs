//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! and applies the `ENDPOINT_HOST_*` env overrides.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::arguments::HostArguments;
use crate::error::HostError;
use crate::logger;

use super::raw::RawConfig;
use super::types::{Config, Overrides};

pub const ENV_ENDPOINT_NAME: &str = "ENDPOINT_HOST_ENDPOINT_NAME";
pub const ENV_SERVICE_NAME: &str = "ENDPOINT_HOST_SERVICE_NAME";
pub const ENV_PROFILES: &str = "ENDPOINT_HOST_PROFILES";
pub const ENV_LOG_LEVEL: &str = "ENDPOINT_HOST_LOG_LEVEL";

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

impl Overrides {
    /// Read the `ENDPOINT_HOST_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self {
            endpoint_name: env::var(ENV_ENDPOINT_NAME).ok(),
            service_name: env::var(ENV_SERVICE_NAME).ok(),
            profiles: env::var(ENV_PROFILES).ok(),
            log_level: env::var(ENV_LOG_LEVEL).ok(),
        }
    }
}

/// Deep-merge two TOML values.
/// Tables are merged recursively — the overlay only needs to specify keys that
/// differ from the base. For every other type (string, integer, array, …)
/// the overlay value replaces the base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, HostError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(HostError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| HostError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| HostError::Config(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = if Path::new(base_str).is_absolute() {
            PathBuf::from(base_str)
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_str)
        };
        debug!(file = %path.display(), base = %base_path.display(), "config inherits base");
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

/// Load config from the given path, or `config/default.toml`, then apply env-var overrides.
/// If no path is given and `config/default.toml` does not exist, the built-in
/// defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, HostError> {
    let overrides = Overrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        debug!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
        resolve(RawConfig::default(), &overrides)
    }
}

/// Internal loader — accepts an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, HostError> {
    let merged_val = load_raw_merged(path, &mut HashSet::new())?;

    let parsed: RawConfig = Deserialize::deserialize(merged_val).map_err(|e: toml::de::Error| {
        HostError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    resolve(parsed, overrides).map_err(|e| match e {
        HostError::Config(msg) => HostError::Config(format!("{msg} in {}", path.display())),
        other => other,
    })
}

fn resolve(parsed: RawConfig, overrides: &Overrides) -> Result<Config, HostError> {
    let host = parsed.host;

    let level = overrides.log_level.as_deref().unwrap_or(&parsed.logging.level);
    let log_level = logger::parse_level(level).map_err(|e| match e {
        HostError::Logger(msg) => HostError::Config(msg),
        other => other,
    })?;

    let profiles = match overrides.profiles.as_deref() {
        Some(list) => split_profiles(list),
        None => host.profiles,
    };

    Ok(Config {
        arguments: HostArguments {
            endpoint_name: overrides.endpoint_name.clone().or(host.endpoint_name),
            service_name: overrides.service_name.clone().or(host.service_name),
            profiles,
        },
        base_dir: host.base_dir.as_deref().map(expand_home),
        log_level,
    })
}

/// Split a comma separated profile list, dropping blanks.
fn split_profiles(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
