//! Core activity authorization types

use serde::{Deserialize, Serialize};

use crate::matcher::activity_name;

/// Assertion about a principal issued by an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Claim type (e.g., "role", "http://schemas.example.com/claims/group")
    #[serde(rename = "type")]
    pub claim_type: String,

    /// Claim value
    pub value: String,

    /// Value type, left unset by the permission builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    /// Issuer that vouches for the claim
    pub issuer: String,
}

impl Claim {
    /// Create a new claim without a value type
    pub fn new(
        claim_type: impl Into<String>,
        value: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: None,
            issuer: issuer.into(),
        }
    }
}

/// Users, roles and claims that satisfy a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// User identifiers, in declaration order
    #[serde(default)]
    pub users: Vec<String>,

    /// Role identifiers, in declaration order
    #[serde(default)]
    pub roles: Vec<String>,

    /// Claim triples
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl Permission {
    /// Create an empty permission
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.users.push(user.into());
        self
    }

    /// Add a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Add a claim
    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    /// True when no user, role or claim is named
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.roles.is_empty() && self.claims.is_empty()
    }
}

/// Named authorization rule binding a resource/action pair to permissions
///
/// The registry key is [`Activity::name`], derived from resource and action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Resource path (e.g., "orders/123")
    pub resource: String,

    /// Action path (e.g., "update/price"), may be empty
    #[serde(default)]
    pub action: String,

    /// Whether this activity applies when nothing more specific is found
    #[serde(default)]
    pub default: bool,

    /// Whether unauthenticated principals are allowed
    #[serde(default)]
    pub allow_unauthenticated: bool,

    /// Who is allowed
    #[serde(default)]
    pub allow: Permission,

    /// Who is denied
    #[serde(default)]
    pub deny: Permission,
}

impl Activity {
    /// Create an activity with empty permissions
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            ..Default::default()
        }
    }

    /// Registry name: `resource.action`, or `resource` when action is empty
    pub fn name(&self) -> String {
        activity_name(&self.resource, &self.action)
    }

    /// Set the allow permission
    pub fn with_allow(mut self, allow: Permission) -> Self {
        self.allow = allow;
        self
    }

    /// Set the deny permission
    pub fn with_deny(mut self, deny: Permission) -> Self {
        self.deny = deny;
        self
    }

    /// Mark as a default activity
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Allow unauthenticated principals
    pub fn with_allow_unauthenticated(mut self, allow: bool) -> Self {
        self.allow_unauthenticated = allow;
        self
    }
}
