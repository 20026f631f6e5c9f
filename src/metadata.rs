//! Endpoint type metadata — the narrow introspection capability the identity
//! resolver depends on.
//!
//! Nothing here inspects types at runtime. A [`TypeDescriptor`] is either
//! assembled by the host from metadata it already has (see
//! [`TypeDescriptor::builder`]) or registered at compile time through the
//! [`EndpointConfig`] trait:
//!
//! ```
//! use endpoint_host::metadata::{EndpointConfig, MarkerDeclaration, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct SalesEndpoint;
//!
//! impl EndpointConfig for SalesEndpoint {
//!     fn markers() -> Vec<MarkerDeclaration> {
//!         vec![MarkerDeclaration::core("Sales")]
//!     }
//! }
//!
//! let descriptor = TypeDescriptor::constructible::<SalesEndpoint>();
//! assert!(descriptor.markers().len() == 1);
//! ```

use tracing::debug;

use crate::error::HostError;

// ── Markers ──────────────────────────────────────────────────────────────────

/// Which layer declared an endpoint name marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerScope {
    /// Legacy marker owned by the process host.
    Host,
    /// Marker owned by the messaging core.
    Core,
}

/// An endpoint name marker declared directly on an endpoint type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDeclaration {
    pub scope: MarkerScope,
    pub name: Option<String>,
}

impl MarkerDeclaration {
    /// Host-level (legacy) marker carrying `name`.
    pub fn host(name: impl Into<String>) -> Self {
        Self {
            scope: MarkerScope::Host,
            name: Some(name.into()),
        }
    }

    /// Core-level marker carrying `name`.
    pub fn core(name: impl Into<String>) -> Self {
        Self {
            scope: MarkerScope::Core,
            name: Some(name.into()),
        }
    }
}

/// What the markers on a type say about its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameDeclaration {
    Undeclared,
    Host(Option<String>),
    Core(Option<String>),
}

impl NameDeclaration {
    /// Collapse the declared markers of a type into a single declaration.
    ///
    /// Declaring both scopes is an error even when they carry the same name.
    /// Repeated markers of one scope keep the first.
    pub fn from_markers(markers: &[MarkerDeclaration]) -> Result<Self, HostError> {
        let host = markers.iter().find(|m| m.scope == MarkerScope::Host);
        let core = markers.iter().find(|m| m.scope == MarkerScope::Core);

        match (host, core) {
            (Some(_), Some(_)) => Err(HostError::ConflictingNameDeclaration),
            (Some(m), None) => Ok(NameDeclaration::Host(m.name.clone())),
            (None, Some(m)) => Ok(NameDeclaration::Core(m.name.clone())),
            (None, None) => Ok(NameDeclaration::Undeclared),
        }
    }
}

// ── MetadataSource ───────────────────────────────────────────────────────────

/// The module (crate, binary, assembly) that contains an endpoint type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Logical module name, used as the service name fallback.
    pub name: String,
    /// File name of the module, used to build the config file path.
    pub file_name: String,
    /// File version declared by the module, if any.
    pub version: Option<String>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Read-only description of an endpoint type.
pub trait MetadataSource {
    /// Fully qualified type name, used in error messages.
    fn full_name(&self) -> &str;

    /// Declared namespace, `None` for types declared at the top level.
    fn namespace(&self) -> Option<&str>;

    /// The module containing the type.
    fn module(&self) -> &ModuleInfo;

    /// Platform-owned qualified identifier, forwarded verbatim.
    fn qualified_name(&self) -> &str;

    /// Whether the type can be built with a public parameterless constructor.
    fn has_default_constructor(&self) -> bool;

    /// Markers declared directly on the type.
    fn declared_markers(&self) -> &[MarkerDeclaration];
}

// ── EndpointConfig ───────────────────────────────────────────────────────────

/// Compile-time registration of an endpoint configuration type.
pub trait EndpointConfig: 'static {
    /// Name markers declared on this endpoint type.
    fn markers() -> Vec<MarkerDeclaration> {
        Vec::new()
    }

    /// File version of the module that contains this type.
    fn module_version() -> Option<String> {
        None
    }
}

// ── TypeDescriptor ───────────────────────────────────────────────────────────

/// Owned [`MetadataSource`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    full_name: String,
    namespace: Option<String>,
    module: ModuleInfo,
    qualified_name: String,
    default_constructor: bool,
    markers: Vec<MarkerDeclaration>,
}

impl TypeDescriptor {
    /// Describe `T`, which can be built through [`Default`].
    pub fn constructible<T: EndpointConfig + Default>() -> Self {
        Self::from_type_name::<T>(true)
    }

    /// Describe `T` without a parameterless constructor.
    pub fn declared<T: EndpointConfig>() -> Self {
        Self::from_type_name::<T>(false)
    }

    /// Start describing a type from metadata supplied by the host.
    pub fn builder(full_name: impl Into<String>, module: ModuleInfo) -> TypeDescriptorBuilder {
        let full_name = full_name.into();
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor {
                qualified_name: full_name.clone(),
                full_name,
                namespace: None,
                module,
                default_constructor: true,
                markers: Vec::new(),
            },
        }
    }

    pub fn markers(&self) -> &[MarkerDeclaration] {
        &self.markers
    }

    fn from_type_name<T: EndpointConfig>(default_constructor: bool) -> Self {
        let type_name = std::any::type_name::<T>();
        let (namespace, crate_name) = split_type_path(type_name);

        let file_name = running_module_file_name().unwrap_or_else(|| crate_name.to_string());
        let mut module = ModuleInfo::new(crate_name, file_name);
        module.version = T::module_version();

        debug!(
            type_name,
            namespace = namespace.unwrap_or("<none>"),
            module = crate_name,
            file_name = %module.file_name,
            "registered endpoint type"
        );

        Self {
            full_name: type_name.to_string(),
            namespace: namespace.map(str::to_string),
            module,
            qualified_name: type_name.to_string(),
            default_constructor,
            markers: T::markers(),
        }
    }
}

impl MetadataSource for TypeDescriptor {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn module(&self) -> &ModuleInfo {
        &self.module
    }

    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn has_default_constructor(&self) -> bool {
        self.default_constructor
    }

    fn declared_markers(&self) -> &[MarkerDeclaration] {
        &self.markers
    }
}

/// Builder returned by [`TypeDescriptor::builder`].
#[derive(Debug, Clone)]
pub struct TypeDescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.descriptor.namespace = Some(namespace.into());
        self
    }

    /// Override the qualified name (defaults to the full name).
    pub fn qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.descriptor.qualified_name = qualified_name.into();
        self
    }

    pub fn default_constructor(mut self, present: bool) -> Self {
        self.descriptor.default_constructor = present;
        self
    }

    pub fn marker(mut self, marker: MarkerDeclaration) -> Self {
        self.descriptor.markers.push(marker);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

/// File name of the running executable, which is the module a compiled-in
/// endpoint type lives in.
fn running_module_file_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.file_name()?.to_string_lossy().into_owned())
}

/// Split a Rust type path into `(namespace, crate name)`.
///
/// Generic arguments are ignored: `a::b::Wrapper<c::D>` has namespace `a::b`.
fn split_type_path(type_name: &str) -> (Option<&str>, &str) {
    let path = type_name.split('<').next().unwrap_or(type_name);
    let namespace = path.rfind("::").map(|idx| &path[..idx]);
    let crate_name = path.split("::").next().unwrap_or(path);
    (namespace, crate_name)
}
