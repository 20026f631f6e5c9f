//! Endpoint host — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (path from the first argument, else `config/default.toml`)
//!   3. Init logger at the configured level (`RUST_LOG` directives on top)
//!   4. Register profiles and their logging handlers
//!   5. Resolve the endpoint identity and run profile handlers
//!   6. Print the result as JSON and exit

use endpoint_host::error::HostError;
use endpoint_host::metadata::{EndpointConfig, MetadataSource, TypeDescriptor};
use endpoint_host::profile::{ConfigureLogging, ProfileHandlerRegistry, ProfileHierarchy, ProfileId};
use endpoint_host::{config, host, logger};
use tracing::info;

/// The endpoint this binary hosts.
#[derive(Debug, Default)]
struct HostedEndpoint;

impl EndpointConfig for HostedEndpoint {
    fn module_version() -> Option<String> {
        Some(env!("CARGO_PKG_VERSION").to_string())
    }
}

/// Logs which profile configured logging for the endpoint.
struct AnnounceLogging(&'static str);

impl ConfigureLogging for AnnounceLogging {
    fn configure(&self, endpoint: &dyn MetadataSource) {
        info!(profile = self.0, endpoint = endpoint.full_name(), "profile logging active");
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), HostError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config_path = std::env::args().nth(1);
    let config = config::load(config_path.as_deref())?;

    logger::init(config.log_level, true)?;

    let mut hierarchy = ProfileHierarchy::new();
    hierarchy
        .register("lite", None)?
        .register("integration", Some(ProfileId::from("lite")))?
        .register("production", None)?;

    let mut handlers = ProfileHandlerRegistry::new();
    handlers
        .bind("lite", AnnounceLogging("lite"))?
        .bind("production", AnnounceLogging("production"))?;

    let endpoint = TypeDescriptor::constructible::<HostedEndpoint>();
    let startup = host::start(&config, &endpoint, &hierarchy, &handlers)?;

    let json = serde_json::to_string_pretty(&startup).map_err(std::io::Error::from)?;
    println!("{json}");

    Ok(())
}
