//! Public configuration types.
//!
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

use crate::arguments::HostArguments;

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Overrides handed to the endpoint identity resolver.
    pub arguments: HostArguments,
    /// Base directory for the endpoint config file, `~` already expanded.
    /// `None` keeps the directory of the running executable.
    pub base_dir: Option<PathBuf>,
    /// Validated `[logging] level`, or its env override.
    pub log_level: LevelFilter,
}

/// Environment overrides applied on top of the file values.
///
/// `load` reads them from the process environment; tests build them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub endpoint_name: Option<String>,
    pub service_name: Option<String>,
    /// Comma separated profile list, replaces the configured profiles.
    pub profiles: Option<String>,
    pub log_level: Option<String>,
}
