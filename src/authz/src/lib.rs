//! # Activity Authorization
//!
//! Resolves which authorization rules ("activities") govern a request made of
//! a resource path and an action path.
//!
//! ## Features
//!
//! - **Hierarchical matching** of `/`-separated resources and actions, most
//!   specific rule first
//! - **Permission model** built from comma-separated users, roles and claims
//! - **Authorization scopes** with a named default activity and scope-wide
//!   defaults
//! - **Hot reload** through an atomically swapped scope reference
//! - **Memoizing cache wrapper** over a pluggable async cache store, with
//!   optional coalescing of concurrent misses
//!
//! This crate resolves rules only. Deciding whether a principal satisfies the
//! resolved permissions, and how allow/deny combine across several matches,
//! is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use activity_authz::config::{ActivityAuthorizationSection, ActivityElement, PermissionElement};
//! use activity_authz::scope::build_scope;
//!
//! let section = ActivityAuthorizationSection {
//!     name: "shop".to_string(),
//!     default_activity: Some("shop".to_string()),
//!     activities: vec![
//!         ActivityElement::named("shop")
//!             .with_allow(PermissionElement::default().with_roles("admin")),
//!         ActivityElement::named("orders.read")
//!             .with_allow(PermissionElement::default().with_roles("clerk, auditor")),
//!     ],
//!     ..Default::default()
//! };
//!
//! let scope = build_scope(Some(&section));
//! let rule = scope.find_activities("orders/42", "read").next().unwrap();
//!
//! assert_eq!(rule.name(), "orders.read");
//! assert_eq!(rule.allow.roles, vec!["clerk", "auditor"]);
//! ```

pub mod activity;
pub mod cache;
pub mod config;
pub mod error;
pub mod matcher;
pub mod permission;
pub mod scope;
pub mod types;

// Re-export commonly used types
pub use activity::ActivityRegistry;
pub use cache::{get_or_create, CacheStore, MemoryCache, SingleFlight};
pub use config::{ActivityAuthorizationSection, ActivityElement, ClaimElement, PermissionElement};
pub use error::{AuthzError, Result};
pub use matcher::{activity_name, candidates, ActivityNames};
pub use scope::{
    build_scope, find_activities, AuthorizationScope, ResolverConfig, ScopeHandle, ScopeResolver,
};
pub use types::{Activity, Claim, Permission};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
