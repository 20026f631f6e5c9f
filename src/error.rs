//! Host-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// The endpoint configuration type cannot be instantiated without arguments.
    #[error("Endpoint configuration type needs to have a default constructor: {type_name}")]
    MissingDefaultConstructor { type_name: String },

    /// Both the host-level and the core-level endpoint name markers are declared.
    #[error(
        "Please either define a [NServiceBus.EndpointNameAttribute] or a [NServiceBus.Hosting.Windows.EndpointNameAttribute], but not both."
    )]
    ConflictingNameDeclaration,

    #[error("profile error: {0}")]
    Profile(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
