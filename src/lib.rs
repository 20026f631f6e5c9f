//! Endpoint host bootstrap.
//!
//! Resolves, once at startup, who the hosted endpoint is and how each active
//! deployment profile wants logging configured:
//!
//! - **endpoint** — [`EndpointIdentityResolver`](endpoint::EndpointIdentityResolver):
//!   name, service name, version, config file path, qualified name.
//! - **profile** — [`ProfileHierarchy`](profile::ProfileHierarchy) and
//!   [`ProfileHandlerResolver`](profile::ProfileHandlerResolver): nearest
//!   logging handler for a profile.
//! - **metadata**, **arguments**, **version** — the read-only sources both
//!   resolvers draw from.
//! - **config**, **logger**, **host** — configuration loading, tracing setup,
//!   and the startup sequence tying everything together.

pub mod arguments;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod host;
pub mod logger;
pub mod metadata;
pub mod profile;
pub mod version;
