//! Endpoint startup — resolves the endpoint identity and runs the logging
//! handler of every active profile, before any message is processed.

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::endpoint::{EndpointIdentity, EndpointIdentityResolver};
use crate::error::HostError;
use crate::metadata::MetadataSource;
use crate::profile::{ProfileHandlerRegistry, ProfileHandlerResolver, ProfileHierarchy, ProfileId};

/// Outcome of the logging handler lookup for one active profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileOutcome {
    pub requested: String,
    /// Profile whose handler ran, `None` when no handler applied.
    pub handled_by: Option<String>,
}

/// Everything resolved during startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Startup {
    pub identity: EndpointIdentity,
    pub profiles: Vec<ProfileOutcome>,
}

/// Resolve the endpoint identity, then configure logging for each active
/// profile in the configured order.
///
/// The identity is resolved first, so a misconfigured endpoint type aborts
/// startup before any handler runs.
pub fn start(
    config: &Config,
    endpoint: &dyn MetadataSource,
    hierarchy: &ProfileHierarchy,
    handlers: &ProfileHandlerRegistry,
) -> Result<Startup, HostError> {
    let mut resolver = EndpointIdentityResolver::with_arguments(&config.arguments, endpoint)?;
    if let Some(base_dir) = &config.base_dir {
        resolver = resolver.with_base_dir(base_dir);
    }

    let identity = resolver.identity()?;
    info!(
        name = identity.name.as_deref().unwrap_or("<unset>"),
        service_name = %identity.service_name,
        version = %identity.version,
        config_file = %identity.config_file_path.display(),
        "endpoint identity resolved"
    );

    let profile_resolver = ProfileHandlerResolver::new(hierarchy, handlers);
    let profiles = config
        .arguments
        .profiles
        .iter()
        .map(|requested| {
            let handled_by = profile_resolver.configure(&ProfileId::from(requested.as_str()), endpoint);
            ProfileOutcome {
                requested: requested.clone(),
                handled_by: handled_by.map(|p| p.to_string()),
            }
        })
        .collect::<Vec<_>>();

    info!(
        active = profiles.len(),
        handled = profiles.iter().filter(|p| p.handled_by.is_some()).count(),
        "profile logging configured"
    );

    Ok(Startup { identity, profiles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::HostArguments;
    use crate::metadata::{MarkerDeclaration, ModuleInfo, TypeDescriptor};
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tracing::level_filters::LevelFilter;

    fn config(profiles: &[&str]) -> Config {
        Config {
            arguments: HostArguments {
                endpoint_name: Some("FromArgs".into()),
                service_name: None,
                profiles: profiles.iter().map(|p| p.to_string()).collect(),
            },
            base_dir: Some(PathBuf::from("/srv/sales")),
            log_level: LevelFilter::INFO,
        }
    }

    fn endpoint() -> TypeDescriptor {
        TypeDescriptor::builder("Acme.Sales.Endpoint", ModuleInfo::new("Acme.Sales", "Acme.Sales.dll"))
            .namespace("Acme.Sales")
            .build()
    }

    #[test]
    fn start_resolves_identity_and_profiles() {
        let mut hierarchy = ProfileHierarchy::new();
        hierarchy.register("lite", None).unwrap();
        hierarchy.register("integration", Some("lite".into())).unwrap();
        hierarchy.register("production", None).unwrap();

        let runs = Rc::new(Cell::new(0));
        let mut handlers = ProfileHandlerRegistry::new();
        {
            let runs = Rc::clone(&runs);
            handlers
                .bind("lite", move |_: &dyn MetadataSource| runs.set(runs.get() + 1))
                .unwrap();
        }

        let startup = start(
            &config(&["integration", "production"]),
            &endpoint(),
            &hierarchy,
            &handlers,
        )
        .unwrap();

        assert_eq!(startup.identity.name.as_deref(), Some("FromArgs"));
        assert_eq!(startup.identity.service_name, "Acme.Sales");
        assert_eq!(
            startup.identity.config_file_path,
            PathBuf::from("/srv/sales/Acme.Sales.dll.config")
        );
        assert_eq!(
            startup.profiles,
            vec![
                ProfileOutcome {
                    requested: "integration".into(),
                    handled_by: Some("lite".into()),
                },
                ProfileOutcome {
                    requested: "production".into(),
                    handled_by: None,
                },
            ]
        );
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn conflicting_markers_abort_before_handlers_run() {
        let endpoint = TypeDescriptor::builder("T", ModuleInfo::new("M", "M.dll"))
            .marker(MarkerDeclaration::host("A"))
            .marker(MarkerDeclaration::core("A"))
            .build();
        let mut hierarchy = ProfileHierarchy::new();
        hierarchy.register("lite", None).unwrap();

        let ran = Rc::new(Cell::new(false));
        let mut handlers = ProfileHandlerRegistry::new();
        {
            let ran = Rc::clone(&ran);
            handlers
                .bind("lite", move |_: &dyn MetadataSource| ran.set(true))
                .unwrap();
        }

        let err = start(&config(&["lite"]), &endpoint, &hierarchy, &handlers).unwrap_err();
        assert!(matches!(err, HostError::ConflictingNameDeclaration));
        assert!(!ran.get());
    }
}
