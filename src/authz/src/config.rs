//! Configuration elements consumed by the builders
//!
//! These mirror an authorization section as it comes out of whatever loader
//! the host application uses. Every field is optional on the wire; absent
//! strings and empty strings are treated the same way by the builders.
//!
//! ```
//! use activity_authz::config::{ActivityAuthorizationSection, ActivityElement};
//!
//! let section = ActivityAuthorizationSection {
//!     name: "orders".to_string(),
//!     activities: vec![ActivityElement::named("orders.read")],
//!     ..Default::default()
//! };
//! assert_eq!(section.activities.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// One claim declaration: a claim type and issuer with comma-separated values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimElement {
    /// Claim type
    pub name: String,

    /// Claim issuer
    pub issuer: String,

    /// Comma-separated claim values (e.g., "a, b")
    pub claims: Option<String>,
}

impl ClaimElement {
    /// Create a claim declaration
    pub fn new(
        name: impl Into<String>,
        issuer: impl Into<String>,
        claims: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            issuer: issuer.into(),
            claims: Some(claims.into()),
        }
    }
}

/// Allow or deny declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionElement {
    /// Comma-separated user identifiers
    pub users: Option<String>,

    /// Comma-separated role identifiers
    pub roles: Option<String>,

    /// Claim declarations
    pub claims: Vec<ClaimElement>,
}

impl PermissionElement {
    /// Set the users string
    pub fn with_users(mut self, users: impl Into<String>) -> Self {
        self.users = Some(users.into());
        self
    }

    /// Set the roles string
    pub fn with_roles(mut self, roles: impl Into<String>) -> Self {
        self.roles = Some(roles.into());
        self
    }

    /// Add a claim declaration
    pub fn with_claim(mut self, claim: ClaimElement) -> Self {
        self.claims.push(claim);
        self
    }
}

/// Declaration of a single activity
///
/// `name` is required and doubles as the source of resource/action when
/// those are not given explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityElement {
    /// Declared name, e.g. "orders.update"
    pub name: String,

    /// Explicit resource, overrides the first segment of `name`
    pub resource: Option<String>,

    /// Explicit action, overrides the second segment of `name`
    pub action: Option<String>,

    /// Default activity flag
    pub default: bool,

    /// Allow unauthenticated principals
    pub allow_unauthenticated: bool,

    /// Allow declaration
    pub allow: Option<PermissionElement>,

    /// Deny declaration
    pub deny: Option<PermissionElement>,
}

impl ActivityElement {
    /// Create a declaration with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set an explicit resource
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set an explicit action
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the allow declaration
    pub fn with_allow(mut self, allow: PermissionElement) -> Self {
        self.allow = Some(allow);
        self
    }

    /// Set the deny declaration
    pub fn with_deny(mut self, deny: PermissionElement) -> Self {
        self.deny = Some(deny);
        self
    }
}

/// A named authorization scope as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityAuthorizationSection {
    /// Scope name
    pub name: String,

    /// Scope-wide fallback decision
    pub default: bool,

    /// Name of the activity used as last-resort fallback
    pub default_activity: Option<String>,

    /// Scope-wide allow-unauthenticated default
    pub default_allow_unauthenticated: bool,

    /// Activity declarations, in declaration order
    pub activities: Vec<ActivityElement>,
}
