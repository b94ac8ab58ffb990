//! Activity builder and registry
//!
//! [`ActivityElement::to_activity`] resolves resource and action for a
//! declaration, and [`ActivityRegistry`] indexes built activities by their
//! derived name for lookup by the matcher.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ActivityElement;
use crate::types::{Activity, Permission};

impl ActivityElement {
    /// Build the [`Activity`] described by this element
    ///
    /// Explicit resource/action win when non-empty. Otherwise the declared
    /// name is split on `.`: the first segment is the resource and the second,
    /// if present, is the action. Further segments are ignored.
    pub fn to_activity(&self) -> Activity {
        let mut parts = self.name.split('.');
        let name_resource = parts.next().unwrap_or_default();
        let name_action = parts.next().unwrap_or_default();

        let resource = non_empty(self.resource.as_deref()).unwrap_or(name_resource);
        let action = non_empty(self.action.as_deref()).unwrap_or(name_action);

        Activity {
            resource: resource.to_string(),
            action: action.to_string(),
            default: self.default,
            allow_unauthenticated: self.allow_unauthenticated,
            allow: self.allow.as_ref().map(Permission::from).unwrap_or_default(),
            deny: self.deny.as_ref().map(Permission::from).unwrap_or_default(),
        }
    }
}

impl From<&ActivityElement> for Activity {
    fn from(element: &ActivityElement) -> Self {
        element.to_activity()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Immutable mapping from activity name to [`Activity`]
///
/// Built once at load time; reloading builds a new registry rather than
/// patching this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityRegistry {
    activities: HashMap<String, Activity>,
}

impl ActivityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Index activities by name; on a name collision the last one wins
    pub fn from_activities<I>(activities: I) -> Self
    where
        I: IntoIterator<Item = Activity>,
    {
        let mut map = HashMap::new();
        for activity in activities {
            let name = activity.name();
            if map.insert(name.clone(), activity).is_some() {
                warn!(activity = %name, "Duplicate activity name, last declaration wins");
            }
        }

        Self { activities: map }
    }

    /// Look up an activity by name
    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.activities.get(name)
    }

    /// Whether an activity with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.activities.contains_key(name)
    }

    /// Number of activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Iterate over `(name, activity)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.activities.iter().map(|(name, activity)| (name.as_str(), activity))
    }
}

impl FromIterator<Activity> for ActivityRegistry {
    fn from_iter<I: IntoIterator<Item = Activity>>(iter: I) -> Self {
        Self::from_activities(iter)
    }
}
