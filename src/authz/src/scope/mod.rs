/// Authorization scopes and activity resolution
///
/// This module builds [`AuthorizationScope`]s from configuration, finds the
/// activities that govern a request, and memoizes built scopes.
///
/// # Examples
///
/// ```
/// use activity_authz::config::{ActivityAuthorizationSection, ActivityElement};
/// use activity_authz::scope::build_scope;
///
/// let section = ActivityAuthorizationSection {
///     name: "orders".to_string(),
///     default_activity: Some("orders".to_string()),
///     activities: vec![
///         ActivityElement::named("orders"),
///         ActivityElement::named("orders.update"),
///     ],
///     ..Default::default()
/// };
///
/// let scope = build_scope(Some(&section));
/// let names: Vec<String> = scope
///     .find_activities("orders/42", "update/price")
///     .map(|activity| activity.name())
///     .collect();
/// assert_eq!(names, vec!["orders.update", "orders", "orders"]);
/// ```

mod handle;
mod resolver;
mod types;


pub use handle::ScopeHandle;
pub use resolver::{find_activities, FindActivities, ResolverConfig, ScopeResolver};
pub use types::{build_scope, AuthorizationScope};
