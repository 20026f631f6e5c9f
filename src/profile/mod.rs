//! Deployment profiles and their hierarchy.
//!
//! Profiles form a single-rooted hierarchy under [`ProfileId::root`]. Each
//! profile's ancestry chain is computed once, when it is registered, so that
//! handler lookup is a plain ordered walk:
//!
//! ```text
//! integration ──▶ lite ──▶ profile (root)
//! ```
//!
//! A profile may declare several parents. Its chain then lists ancestors
//! breadth-first by depth, ties in declaration order, each ancestor once.

pub mod handler;

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::debug;

use crate::error::HostError;

pub use handler::{
    ConfigureLogging, ProfileHandlerBinding, ProfileHandlerRegistry, ProfileHandlerResolver,
};

// ── ProfileId ────────────────────────────────────────────────────────────────

/// Identifier of a profile type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(String);

impl ProfileId {
    pub const ROOT: &'static str = "profile";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The profile every other profile descends from.
    pub fn root() -> Self {
        Self::new(Self::ROOT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProfileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ── ProfileHierarchy ─────────────────────────────────────────────────────────

/// Registered profiles with their precomputed ancestry chains.
#[derive(Debug, Clone)]
pub struct ProfileHierarchy {
    parents: HashMap<ProfileId, Vec<ProfileId>>,
    chains: HashMap<ProfileId, Vec<ProfileId>>,
}

impl Default for ProfileHierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileHierarchy {
    /// Hierarchy containing only the root profile.
    pub fn new() -> Self {
        let root = ProfileId::root();
        Self {
            parents: HashMap::from([(root.clone(), Vec::new())]),
            chains: HashMap::from([(root.clone(), vec![root])]),
        }
    }

    /// Register `id` under `parent`, or directly under the root when `None`.
    pub fn register(
        &mut self,
        id: impl Into<ProfileId>,
        parent: Option<ProfileId>,
    ) -> Result<&mut Self, HostError> {
        let parents = vec![parent.unwrap_or_else(ProfileId::root)];
        self.insert(id.into(), parents)
    }

    /// Register `id` with several direct parents, in declaration order.
    pub fn register_with_parents<I, P>(
        &mut self,
        id: impl Into<ProfileId>,
        parents: I,
    ) -> Result<&mut Self, HostError>
    where
        I: IntoIterator<Item = P>,
        P: Into<ProfileId>,
    {
        let mut parents: Vec<ProfileId> = parents.into_iter().map(Into::into).collect();
        if parents.is_empty() {
            parents.push(ProfileId::root());
        }
        self.insert(id.into(), parents)
    }

    pub fn contains(&self, id: &ProfileId) -> bool {
        self.chains.contains_key(id)
    }

    /// The profile followed by its ancestors, nearest first.
    ///
    /// An unregistered profile has no declared parents, so it descends
    /// directly from the root.
    pub fn ancestry(&self, id: &ProfileId) -> Vec<ProfileId> {
        match self.chains.get(id) {
            Some(chain) => chain.clone(),
            None => {
                debug!(profile = %id, "profile not registered, only the root is an ancestor");
                vec![id.clone(), ProfileId::root()]
            }
        }
    }

    fn insert(&mut self, id: ProfileId, parents: Vec<ProfileId>) -> Result<&mut Self, HostError> {
        if self.parents.contains_key(&id) {
            return Err(HostError::Profile(format!("profile '{id}' is already registered")));
        }
        if let Some(unknown) = parents.iter().find(|p| !self.parents.contains_key(*p)) {
            return Err(HostError::Profile(format!(
                "profile '{id}' declares unknown parent '{unknown}'; register parents first"
            )));
        }

        let chain = self.walk(&id, &parents);
        debug!(
            profile = %id,
            chain = %chain.iter().map(ProfileId::as_str).collect::<Vec<_>>().join(" -> "),
            "profile registered"
        );

        self.parents.insert(id.clone(), parents);
        self.chains.insert(id, chain);
        Ok(self)
    }

    /// Breadth-first ancestry of a profile not yet inserted.
    fn walk(&self, id: &ProfileId, parents: &[ProfileId]) -> Vec<ProfileId> {
        let mut chain = vec![id.clone()];
        let mut seen: HashSet<ProfileId> = HashSet::from([id.clone()]);
        let mut queue: VecDeque<ProfileId> = parents.iter().cloned().collect();

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(grandparents) = self.parents.get(&next) {
                queue.extend(grandparents.iter().cloned());
            }
            chain.push(next);
        }
        chain
    }
}
