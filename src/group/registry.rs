//! Group Registry Module
//!
//! Owns every named group for the life of the service. Constructed once and
//! shared through application state rather than held in a global.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::group::{Getter, Group};

// == Group Registry ==
/// Mapping from group name to group.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Creates a group and registers it under `name`.
    ///
    /// Registering an existing name replaces the previous group; callers still
    /// holding the old `Arc<Group>` keep using it until they drop it.
    pub fn register(
        &self,
        name: impl Into<String>,
        max_bytes: usize,
        getter: impl Getter + 'static,
    ) -> Arc<Group> {
        let name = name.into();
        let group = Arc::new(Group::new(name.clone(), max_bytes, getter));

        let previous = self.groups.write().insert(name.clone(), Arc::clone(&group));
        if previous.is_some() {
            warn!(group = %name, "replaced existing group");
        }
        info!(group = %name, max_bytes, "registered group");

        group
    }

    // == Lookup ==
    /// Returns the group registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns all groups sorted by name.
    pub fn groups(&self) -> Vec<Arc<Group>> {
        let mut groups: Vec<Arc<Group>> = self.groups.read().values().cloned().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        groups
    }

    /// Returns all group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}
