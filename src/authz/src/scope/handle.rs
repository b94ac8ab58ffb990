/// Atomically swappable scope reference for hot reload
///
/// Readers take a snapshot with [`ScopeHandle::load`] and keep matching
/// against it even if a reload lands mid-request.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::config::ActivityAuthorizationSection;

use super::types::{build_scope, AuthorizationScope};

/// Holds the current [`AuthorizationScope`]
#[derive(Debug)]
pub struct ScopeHandle {
    current: ArcSwap<AuthorizationScope>,
}

impl ScopeHandle {
    /// Create a handle holding `scope`
    pub fn new(scope: AuthorizationScope) -> Self {
        Self {
            current: ArcSwap::from_pointee(scope),
        }
    }

    /// Create a handle from an optional configuration section
    pub fn from_section(section: Option<&ActivityAuthorizationSection>) -> Self {
        Self::new(build_scope(section))
    }

    /// Snapshot of the current scope
    pub fn load(&self) -> Arc<AuthorizationScope> {
        self.current.load_full()
    }

    /// Install `scope`, returning the one it replaced
    pub fn replace(&self, scope: AuthorizationScope) -> Arc<AuthorizationScope> {
        self.install(Arc::new(scope))
    }

    /// Install an already shared scope, returning the one it replaced
    pub fn install(&self, scope: Arc<AuthorizationScope>) -> Arc<AuthorizationScope> {
        self.current.swap(scope)
    }

    /// Rebuild from `section` and swap it in, returning the previous scope
    pub fn reload(&self, section: Option<&ActivityAuthorizationSection>) -> Arc<AuthorizationScope> {
        let scope = build_scope(section);
        info!(
            scope = %scope.name,
            activities = scope.activities.len(),
            "Reloaded authorization scope"
        );
        self.replace(scope)
    }
}

impl Default for ScopeHandle {
    fn default() -> Self {
        Self::new(AuthorizationScope::default())
    }
}
