//! Endpoint identity resolution.
//!
//! [`EndpointIdentityResolver`] combines three read-only sources into the
//! identity of the hosted endpoint:
//!
//! - the endpoint type's [`MetadataSource`] (markers, namespace, module),
//! - the [`HostArguments`] parsed by the host,
//! - a [`VersionProvider`].
//!
//! Construction validates the endpoint type once. Every accessor afterwards is
//! a pure read computed on demand; nothing is cached.
//!
//! # Name precedence
//!
//! 1. host-level marker on the type
//! 2. core-level marker on the type
//! 3. host argument
//! 4. unset (`None`)
//!
//! Declaring both markers is an error, raised when the name is read.

use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::arguments::HostArguments;
use crate::error::HostError;
use crate::metadata::{MetadataSource, NameDeclaration};
use crate::version::{ModuleVersion, VersionProvider};

/// Suffix appended to the module file name to build the config file path.
pub const CONFIG_FILE_SUFFIX: &str = ".config";

/// Snapshot of every identity field of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointIdentity {
    pub name: Option<String>,
    pub service_name: String,
    pub version: String,
    pub config_file_path: PathBuf,
    pub qualified_name: String,
}

/// Resolves the identity of one endpoint type.
pub struct EndpointIdentityResolver<'a> {
    endpoint: &'a dyn MetadataSource,
    arguments: Cow<'a, HostArguments>,
    versions: &'a dyn VersionProvider,
    base_dir: PathBuf,
}

impl std::fmt::Debug for EndpointIdentityResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointIdentityResolver")
            .field("endpoint", &self.endpoint.full_name())
            .field("arguments", &self.arguments)
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl<'a> EndpointIdentityResolver<'a> {
    /// Resolver with no host arguments.
    pub fn new(endpoint: &'a dyn MetadataSource) -> Result<Self, HostError> {
        Self::build(Cow::Owned(HostArguments::default()), endpoint)
    }

    /// Resolver backed by the given host arguments.
    pub fn with_arguments(
        arguments: &'a HostArguments,
        endpoint: &'a dyn MetadataSource,
    ) -> Result<Self, HostError> {
        Self::build(Cow::Borrowed(arguments), endpoint)
    }

    fn build(
        arguments: Cow<'a, HostArguments>,
        endpoint: &'a dyn MetadataSource,
    ) -> Result<Self, HostError> {
        if !endpoint.has_default_constructor() {
            return Err(HostError::MissingDefaultConstructor {
                type_name: endpoint.full_name().to_string(),
            });
        }

        Ok(Self {
            endpoint,
            arguments,
            versions: &ModuleVersion,
            base_dir: process_base_dir(),
        })
    }

    /// Replace the default [`ModuleVersion`] provider.
    pub fn with_version_provider(mut self, versions: &'a dyn VersionProvider) -> Self {
        self.versions = versions;
        self
    }

    /// Replace the process base directory used for [`Self::config_file_path`].
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn endpoint(&self) -> &dyn MetadataSource {
        self.endpoint
    }

    pub fn arguments(&self) -> &HostArguments {
        &self.arguments
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Logical endpoint name, `None` when no source declares one.
    pub fn name(&self) -> Result<Option<String>, HostError> {
        let name = match NameDeclaration::from_markers(self.endpoint.declared_markers())? {
            NameDeclaration::Host(name) => {
                debug!(endpoint = self.endpoint.full_name(), "endpoint name from host marker");
                name
            }
            NameDeclaration::Core(name) => {
                debug!(endpoint = self.endpoint.full_name(), "endpoint name from core marker");
                name
            }
            NameDeclaration::Undeclared => self.arguments.endpoint_name.clone(),
        };
        Ok(name)
    }

    /// Namespace of the endpoint type (or its module name), unless the host
    /// arguments supply a service name.
    pub fn service_name(&self) -> String {
        if let Some(service_name) = &self.arguments.service_name {
            return service_name.clone();
        }
        self.endpoint
            .namespace()
            .unwrap_or(&self.endpoint.module().name)
            .to_string()
    }

    pub fn version(&self) -> String {
        self.versions.file_version(self.endpoint)
    }

    /// `{base_dir}/{module file name}.config`. The file is never touched.
    pub fn config_file_path(&self) -> PathBuf {
        let file_name = format!("{}{CONFIG_FILE_SUFFIX}", self.endpoint.module().file_name);
        self.base_dir.join(file_name)
    }

    pub fn qualified_name(&self) -> &str {
        self.endpoint.qualified_name()
    }

    /// Resolve every field at once.
    pub fn identity(&self) -> Result<EndpointIdentity, HostError> {
        Ok(EndpointIdentity {
            name: self.name()?,
            service_name: self.service_name(),
            version: self.version(),
            config_file_path: self.config_file_path(),
            qualified_name: self.qualified_name().to_string(),
        })
    }
}

/// Directory of the running executable, else the working directory.
fn process_base_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MarkerDeclaration, MarkerScope, ModuleInfo, TypeDescriptor};
    use crate::version::FixedVersion;

    fn endpoint() -> TypeDescriptor {
        TypeDescriptor::builder(
            "Acme.Sales.SalesEndpoint",
            ModuleInfo::new("Acme.Sales", "Acme.Sales.dll"),
        )
        .namespace("Acme.Sales")
        .qualified_name("Acme.Sales.SalesEndpoint, Acme.Sales, Version=1.0.0.0")
        .build()
    }

    fn host_args() -> HostArguments {
        HostArguments::default().with_endpoint_name("EndpointNameFromHostArgs")
    }

    #[test]
    fn missing_default_constructor_fails_construction() {
        let d = TypeDescriptor::builder("Acme.NoCtor", ModuleInfo::new("Acme", "Acme.dll"))
            .default_constructor(false)
            .build();
        let err = EndpointIdentityResolver::new(&d).unwrap_err();
        assert!(matches!(err, HostError::MissingDefaultConstructor { .. }));
        assert!(err.to_string().starts_with(
            "Endpoint configuration type needs to have a default constructor"
        ));
        assert!(err.to_string().contains("Acme.NoCtor"));
    }

    #[test]
    fn no_sources_leaves_name_unset() {
        let d = endpoint();
        let resolver = EndpointIdentityResolver::new(&d).unwrap();
        assert_eq!(resolver.name().unwrap(), None);
    }

    #[test]
    fn host_marker_beats_host_arguments() {
        let d = TypeDescriptor::builder("T", ModuleInfo::new("M", "M.dll"))
            .marker(MarkerDeclaration::host("EndpointNameFromAttribute"))
            .build();
        let args = host_args();
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();
        assert_eq!(resolver.name().unwrap().as_deref(), Some("EndpointNameFromAttribute"));
    }

    #[test]
    fn core_marker_beats_host_arguments() {
        let d = TypeDescriptor::builder("T", ModuleInfo::new("M", "M.dll"))
            .marker(MarkerDeclaration::core("EndpointNameFromCoreAttribute"))
            .build();
        let args = host_args();
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();
        assert_eq!(
            resolver.name().unwrap().as_deref(),
            Some("EndpointNameFromCoreAttribute")
        );
    }

    #[test]
    fn nameless_marker_shadows_host_arguments() {
        let args = host_args();
        for scope in [MarkerScope::Host, MarkerScope::Core] {
            let d = TypeDescriptor::builder("T", ModuleInfo::new("M", "M.dll"))
                .marker(MarkerDeclaration { scope, name: None })
                .build();
            let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();
            assert_eq!(resolver.name().unwrap(), None, "{scope:?} marker without a name");
        }
    }

    #[test]
    fn both_markers_fail_on_name_access_only() {
        let d = TypeDescriptor::builder("T", ModuleInfo::new("M", "M.dll"))
            .marker(MarkerDeclaration::core("EndpointNameFromCoreAttribute"))
            .marker(MarkerDeclaration::host("EndpointNameAttribute"))
            .build();
        let args = host_args();
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();

        // Other fields stay readable.
        assert_eq!(resolver.service_name(), "M");

        let err = resolver.name().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please either define a [NServiceBus.EndpointNameAttribute] or a [NServiceBus.Hosting.Windows.EndpointNameAttribute], but not both."
        );
        assert!(resolver.identity().is_err());
    }

    #[test]
    fn host_argument_name_used_without_markers() {
        let d = endpoint();
        let args = host_args();
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();
        assert_eq!(resolver.name().unwrap().as_deref(), Some("EndpointNameFromHostArgs"));
    }

    #[test]
    fn service_name_defaults_to_namespace() {
        let d = endpoint();
        let args = HostArguments::default();
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();
        assert_eq!(resolver.service_name(), "Acme.Sales");
    }

    #[test]
    fn service_name_falls_back_to_module_name() {
        let d = TypeDescriptor::builder("TopLevel", ModuleInfo::new("Acme.Tests", "Acme.Tests.dll"))
            .build();
        let resolver = EndpointIdentityResolver::new(&d).unwrap();
        assert_eq!(resolver.service_name(), "Acme.Tests");
    }

    #[test]
    fn service_name_from_host_arguments_wins() {
        let d = endpoint();
        let args = HostArguments::default().with_service_name("ServiceNameFromHostArgs");
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d).unwrap();
        assert_eq!(resolver.service_name(), "ServiceNameFromHostArgs");
    }

    #[test]
    fn version_is_forwarded_verbatim() {
        let d = endpoint();
        let versions = FixedVersion(" 2.0-beta+build.7 ".into());
        let resolver = EndpointIdentityResolver::new(&d)
            .unwrap()
            .with_version_provider(&versions);
        assert_eq!(resolver.version(), " 2.0-beta+build.7 ");
    }

    #[test]
    fn config_file_path_is_base_dir_plus_module_file() {
        let d = endpoint();
        let resolver = EndpointIdentityResolver::new(&d)
            .unwrap()
            .with_base_dir("/opt/endpoints/sales");
        assert_eq!(
            resolver.config_file_path(),
            PathBuf::from("/opt/endpoints/sales/Acme.Sales.dll.config")
        );
    }

    #[test]
    fn default_base_dir_is_not_empty() {
        let d = endpoint();
        let resolver = EndpointIdentityResolver::new(&d).unwrap();
        assert!(!resolver.base_dir().as_os_str().is_empty());
        assert!(resolver.config_file_path().ends_with("Acme.Sales.dll.config"));
    }

    #[test]
    fn qualified_name_is_forwarded() {
        let d = endpoint();
        let resolver = EndpointIdentityResolver::new(&d).unwrap();
        assert_eq!(
            resolver.qualified_name(),
            "Acme.Sales.SalesEndpoint, Acme.Sales, Version=1.0.0.0"
        );
    }

    #[test]
    fn identity_is_idempotent() {
        let d = endpoint();
        let args = host_args().with_service_name("Sales");
        let resolver = EndpointIdentityResolver::with_arguments(&args, &d)
            .unwrap()
            .with_base_dir("/srv");
        let first = resolver.identity().unwrap();
        let second = resolver.identity().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.name.as_deref(), Some("EndpointNameFromHostArgs"));
        assert_eq!(first.version, "0.0.0");
    }
}
