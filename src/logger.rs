//! Process-wide `tracing` subscriber for the host.
//!
//! The configured level is validated while the config is loaded (see
//! [`parse_level`]), so [`init`] only fails when a subscriber is already
//! installed. Profile-specific handlers run after it.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::HostError;

/// Install the fmt subscriber on stderr, filtering at `level`.
///
/// With `respect_rust_log`, directives in `RUST_LOG` are applied on top of
/// `level`; unparsable directives there are skipped.
pub fn init(level: LevelFilter, respect_rust_log: bool) -> Result<(), HostError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, respect_rust_log))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| HostError::Logger(format!("failed to set subscriber: {e}")))
}

fn build_filter(level: LevelFilter, respect_rust_log: bool) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    if respect_rust_log {
        builder.from_env_lossy()
    } else {
        builder.parse_lossy("")
    }
}

/// Parse a plain level name (`"off"`, `"error"` … `"trace"`).
///
/// Filter directives such as `endpoint_host=debug` are rejected; use
/// `RUST_LOG` for those.
pub fn parse_level(level: &str) -> Result<LevelFilter, HostError> {
    let trimmed = level.trim();
    if trimmed.is_empty() {
        return Err(HostError::Logger("log level must not be empty".into()));
    }
    trimmed
        .parse::<LevelFilter>()
        .map_err(|_| HostError::Logger(format!("unrecognised log level: '{level}'")))
}
