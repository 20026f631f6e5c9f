//! Endpoint version lookup.

use crate::metadata::MetadataSource;

/// Version reported when the module declares none.
pub const UNKNOWN_VERSION: &str = "0.0.0";

/// Returns the file version of the module containing an endpoint type.
///
/// The identity resolver forwards the result verbatim.
pub trait VersionProvider {
    fn file_version(&self, endpoint: &dyn MetadataSource) -> String;
}

/// Reads the version declared on the endpoint's [`ModuleInfo`](crate::metadata::ModuleInfo).
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleVersion;

impl VersionProvider for ModuleVersion {
    fn file_version(&self, endpoint: &dyn MetadataSource) -> String {
        endpoint
            .module()
            .version
            .clone()
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }
}

/// Always reports the same version, whatever the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVersion(pub String);

impl VersionProvider for FixedVersion {
    fn file_version(&self, _endpoint: &dyn MetadataSource) -> String {
        self.0.clone()
    }
}
