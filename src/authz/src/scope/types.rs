/// Authorization scope type and construction
///
/// An [`AuthorizationScope`] is the immutable, built form of an
/// [`ActivityAuthorizationSection`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::activity::ActivityRegistry;
use crate::config::ActivityAuthorizationSection;
use crate::types::Activity;

use super::resolver::{find_activities, FindActivities};

/// Named collection of activities plus scope-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationScope {
    /// Scope name
    pub name: String,

    /// Fallback decision when no activity matches
    pub default_authorization: bool,

    /// Activity used as last-resort fallback
    pub default_activity: Option<String>,

    /// Scope-wide allow-unauthenticated default
    pub allow_unauthenticated: bool,

    /// Activities keyed by derived name
    pub activities: ActivityRegistry,
}

impl AuthorizationScope {
    /// Build a scope from an optional configuration section
    ///
    /// See [`build_scope`].
    pub fn from_section(section: Option<&ActivityAuthorizationSection>) -> Self {
        build_scope(section)
    }

    /// Activities governing `resource`/`action`, most specific first, with
    /// this scope's default activity last
    pub fn find_activities<'s>(&'s self, resource: &'s str, action: &'s str) -> FindActivities<'s> {
        find_activities(
            &self.activities,
            resource,
            action,
            self.default_activity.as_deref(),
        )
    }

    /// The configured default activity, if it exists in the registry
    pub fn default_activity(&self) -> Option<&Activity> {
        self.default_activity
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| self.activities.get(name))
    }
}

/// Build an [`AuthorizationScope`] from configuration
///
/// A missing section gives an empty scope with all defaults unset. Activity
/// declarations are keyed by their derived name; when two declare the same
/// name the later one wins.
pub fn build_scope(section: Option<&ActivityAuthorizationSection>) -> AuthorizationScope {
    let Some(section) = section else {
        return AuthorizationScope::default();
    };

    let activities = ActivityRegistry::from_activities(
        section.activities.iter().map(|element| element.to_activity()),
    );

    info!(
        scope = %section.name,
        activities = activities.len(),
        "Built authorization scope"
    );

    AuthorizationScope {
        name: section.name.clone(),
        default_authorization: section.default,
        default_activity: section.default_activity.clone().filter(|name| !name.is_empty()),
        allow_unauthenticated: section.default_allow_unauthenticated,
        activities,
    }
}
