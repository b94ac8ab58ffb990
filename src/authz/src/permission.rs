//! Permission builder
//!
//! Turns the raw comma-separated strings of a [`PermissionElement`] into a
//! structured [`Permission`]. No validation is applied to claim types or
//! issuers; whatever was configured is passed through trimmed.

use crate::config::{ClaimElement, PermissionElement};
use crate::types::{Claim, Permission};

impl PermissionElement {
    /// Build the [`Permission`] described by this element
    pub fn to_permission(&self) -> Permission {
        let mut claims = Vec::new();
        for element in &self.claims {
            claims.extend(element.to_claims());
        }

        Permission {
            users: split_list(self.users.as_deref()),
            roles: split_list(self.roles.as_deref()),
            claims,
        }
    }
}

impl From<&PermissionElement> for Permission {
    fn from(element: &PermissionElement) -> Self {
        element.to_permission()
    }
}

impl ClaimElement {
    /// Expand the comma-separated values into one claim each
    ///
    /// An absent or empty value string yields no claims.
    pub fn to_claims(&self) -> Vec<Claim> {
        let values = match self.claims.as_deref() {
            Some(values) if !values.is_empty() => values,
            _ => return Vec::new(),
        };

        let claim_type = self.name.trim();
        let issuer = self.issuer.trim();
        values
            .split(',')
            .map(|value| Claim::new(claim_type, value.trim(), issuer))
            .collect()
    }
}

/// Split on `,` and trim each token, keeping order and duplicates
///
/// Absent or empty input gives an empty list, never `[""]`.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) if !raw.is_empty() => raw.split(',').map(|s| s.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}
