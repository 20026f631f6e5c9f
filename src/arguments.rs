//! Host arguments — startup overrides already parsed by the hosting process.

/// Explicit overrides supplied by the host.
///
/// `HostArguments::default()` is the empty source used when the host passes
/// none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostArguments {
    /// Endpoint name, used only when the endpoint type declares no name marker.
    pub endpoint_name: Option<String>,
    /// Service name, always wins over the type-derived default.
    pub service_name: Option<String>,
    /// Profiles activated for this run, in the order they were given.
    pub profiles: Vec<String>,
}

impl HostArguments {
    pub fn with_endpoint_name(mut self, name: impl Into<String>) -> Self {
        self.endpoint_name = Some(name.into());
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }
}
