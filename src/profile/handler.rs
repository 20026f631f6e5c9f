//! Profile-specific logging handlers.
//!
//! A [`ConfigureLogging`] handler is bound to one profile in a
//! [`ProfileHandlerRegistry`]. At startup the [`ProfileHandlerResolver`] picks,
//! for each requested profile, the binding of the nearest profile in its
//! ancestry chain and invokes it once. Finding nothing is normal: profile
//! specific logging is optional.

use std::fmt;

use tracing::debug;

use crate::error::HostError;
use crate::metadata::MetadataSource;

use super::{ProfileHierarchy, ProfileId};

/// Logging configuration for a profile.
pub trait ConfigureLogging {
    /// Perform all logging configuration for `endpoint`.
    fn configure(&self, endpoint: &dyn MetadataSource);
}

impl<F> ConfigureLogging for F
where
    F: Fn(&dyn MetadataSource),
{
    fn configure(&self, endpoint: &dyn MetadataSource) {
        self(endpoint)
    }
}

type HandlerFactory = Box<dyn Fn() -> Box<dyn ConfigureLogging>>;

enum HandlerSource {
    Instance(Box<dyn ConfigureLogging>),
    Factory(HandlerFactory),
}

/// A handler bound to the profile it configures.
pub struct ProfileHandlerBinding {
    profile: ProfileId,
    source: HandlerSource,
}

impl ProfileHandlerBinding {
    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Invoke the bound handler, building it first when bound as a factory.
    pub fn configure(&self, endpoint: &dyn MetadataSource) {
        match &self.source {
            HandlerSource::Instance(handler) => handler.configure(endpoint),
            HandlerSource::Factory(factory) => factory().configure(endpoint),
        }
    }
}

impl fmt::Debug for ProfileHandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.source {
            HandlerSource::Instance(_) => "instance",
            HandlerSource::Factory(_) => "factory",
        };
        f.debug_struct("ProfileHandlerBinding")
            .field("profile", &self.profile)
            .field("source", &kind)
            .finish()
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Profile → handler bindings, filled once at startup.
#[derive(Debug, Default)]
pub struct ProfileHandlerRegistry {
    bindings: Vec<ProfileHandlerBinding>,
}

impl ProfileHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler instance to `profile`.
    pub fn bind<H>(
        &mut self,
        profile: impl Into<ProfileId>,
        handler: H,
    ) -> Result<&mut Self, HostError>
    where
        H: ConfigureLogging + 'static,
    {
        self.push(profile.into(), HandlerSource::Instance(Box::new(handler)))
    }

    /// Bind a factory that builds the handler when it is selected.
    pub fn bind_factory<F, H>(
        &mut self,
        profile: impl Into<ProfileId>,
        factory: F,
    ) -> Result<&mut Self, HostError>
    where
        F: Fn() -> H + 'static,
        H: ConfigureLogging + 'static,
    {
        let boxed: HandlerFactory =
            Box::new(move || -> Box<dyn ConfigureLogging> { Box::new(factory()) });
        self.push(profile.into(), HandlerSource::Factory(boxed))
    }

    pub fn get(&self, profile: &ProfileId) -> Option<&ProfileHandlerBinding> {
        self.bindings.iter().find(|b| &b.profile == profile)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn push(&mut self, profile: ProfileId, source: HandlerSource) -> Result<&mut Self, HostError> {
        if self.get(&profile).is_some() {
            return Err(HostError::Profile(format!(
                "a logging handler is already bound to profile '{profile}'"
            )));
        }
        self.bindings.push(ProfileHandlerBinding { profile, source });
        Ok(self)
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

/// Finds and runs the nearest logging handler for a profile.
#[derive(Debug, Clone, Copy)]
pub struct ProfileHandlerResolver<'a> {
    hierarchy: &'a ProfileHierarchy,
    registry: &'a ProfileHandlerRegistry,
}

impl<'a> ProfileHandlerResolver<'a> {
    pub fn new(hierarchy: &'a ProfileHierarchy, registry: &'a ProfileHandlerRegistry) -> Self {
        Self {
            hierarchy,
            registry,
        }
    }

    /// Binding for `profile` itself, else for its nearest bound ancestor.
    pub fn resolve(&self, profile: &ProfileId) -> Option<&'a ProfileHandlerBinding> {
        if let Some(binding) = self.registry.get(profile) {
            return Some(binding);
        }
        self.hierarchy
            .ancestry(profile)
            .iter()
            .skip(1)
            .find_map(|ancestor| self.registry.get(ancestor))
    }

    /// Run the resolved handler once against `endpoint`.
    ///
    /// Returns the profile whose binding ran, `None` when nothing matched.
    pub fn configure(
        &self,
        profile: &ProfileId,
        endpoint: &dyn MetadataSource,
    ) -> Option<ProfileId> {
        let Some(binding) = self.resolve(profile) else {
            debug!(profile = %profile, "no logging handler for profile");
            return None;
        };
        debug!(
            profile = %profile,
            handler_profile = %binding.profile(),
            "configuring logging for profile"
        );
        binding.configure(endpoint);
        Some(binding.profile().clone())
    }
}
