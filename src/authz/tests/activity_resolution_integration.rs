//! Integration tests for activity resolution
//!
//! Drives the full path from a parsed configuration section through scope
//! construction to ordered activity lookup.

use activity_authz::{
    build_scope, candidates, find_activities, Activity, ActivityAuthorizationSection,
    ActivityRegistry, Claim, ScopeHandle,
};
use std::sync::Arc;
use tokio::task::JoinSet;

const SHOP_CONFIG: &str = r#"{
    "name": "shop",
    "default": false,
    "defaultActivity": "shop",
    "defaultAllowUnauthenticated": false,
    "activities": [
        {
            "name": "shop",
            "allow": { "roles": "admin" }
        },
        {
            "name": "catalog.read",
            "allowUnauthenticated": true
        },
        {
            "name": "orders",
            "allow": { "roles": "clerk, manager" },
            "deny": { "users": "mallory" }
        },
        {
            "name": "orders.update",
            "allow": {
                "roles": "manager",
                "claims": [
                    { "name": "department", "issuer": "https://idp.example.com", "claims": "sales, finance" }
                ]
            }
        },
        {
            "name": "LargeOrderPricing",
            "resource": "orders/enterprise",
            "action": "update/price",
            "allow": { "users": "carol" }
        }
    ]
}"#;

fn shop_section() -> ActivityAuthorizationSection {
    serde_json::from_str(SHOP_CONFIG).expect("valid shop configuration")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn names<'a>(found: impl Iterator<Item = &'a Activity>) -> Vec<String> {
    found.map(|activity| activity.name()).collect()
}

// ============================================================================
// CANDIDATE NAMES
// ============================================================================

#[test]
fn test_candidate_names_documented_order() {
    let found: Vec<String> = candidates("orders/123", "update/price").collect();

    assert_eq!(
        found,
        vec![
            "orders/123.update/price",
            "orders/123.update",
            "orders/123",
            "orders.update/price",
            "orders.update",
            "orders",
            ".update/price",
            ".update",
        ]
    );
}

#[test]
fn test_candidate_edge_cases() {
    assert_eq!(candidates("", "").count(), 0);
    assert_eq!(candidates("orders", "").collect::<Vec<_>>(), vec!["orders"]);
}

// ============================================================================
// SCOPE RESOLUTION
// ============================================================================

#[test]
fn test_scope_from_configuration() {
    init_tracing();
    let scope = build_scope(Some(&shop_section()));

    assert_eq!(scope.name, "shop");
    assert!(!scope.default_authorization);
    assert_eq!(scope.activities.len(), 5);

    let orders = scope.activities.get("orders").unwrap();
    assert_eq!(orders.allow.roles, vec!["clerk", "manager"]);
    assert_eq!(orders.deny.users, vec!["mallory"]);
    assert!(orders.allow.users.is_empty());

    let update = scope.activities.get("orders.update").unwrap();
    assert_eq!(
        update.allow.claims,
        vec![
            Claim::new("department", "sales", "https://idp.example.com"),
            Claim::new("department", "finance", "https://idp.example.com"),
        ]
    );

    assert!(scope.activities.get("catalog.read").unwrap().allow_unauthenticated);
    assert!(scope.activities.contains("orders/enterprise.update/price"));
}

#[test]
fn test_enterprise_price_update() {
    let scope = build_scope(Some(&shop_section()));

    let found = names(scope.find_activities("orders/enterprise", "update/price"));
    assert_eq!(
        found,
        vec!["orders/enterprise.update/price", "orders.update", "orders", "shop"]
    );

    let rule = scope.find_activities("orders/enterprise", "update/price").next().unwrap();
    assert_eq!(rule.allow.users, vec!["carol"]);
}

#[test]
fn test_regular_order_update() {
    let scope = build_scope(Some(&shop_section()));

    let found = names(scope.find_activities("orders/42", "update/price"));
    assert_eq!(found, vec!["orders.update", "orders", "shop"]);
}

#[test]
fn test_catalog_read_allows_anonymous() {
    let scope = build_scope(Some(&shop_section()));

    let rule = scope.find_activities("catalog/books/1", "read").next().unwrap();
    assert_eq!(rule.name(), "catalog.read");
    assert!(rule.allow_unauthenticated);
}

#[test]
fn test_unmatched_request_uses_default_activity() {
    let scope = build_scope(Some(&shop_section()));

    let found = names(scope.find_activities("reports/daily", "export"));
    assert_eq!(found, vec!["shop"]);
}

#[test]
fn test_registry_lookup_with_explicit_default() {
    let registry = ActivityRegistry::from_activities(vec![
        Activity::new("orders", ""),
        Activity::new("audit", ""),
    ]);

    let found = names(find_activities(&registry, "orders/1", "read", Some("audit")));
    assert_eq!(found, vec!["orders", "audit"]);

    let found = names(find_activities(&registry, "orders/1", "read", None));
    assert_eq!(found, vec!["orders"]);
}

#[test]
fn test_missing_section() {
    let scope = build_scope(None);
    assert!(scope.activities.is_empty());
    assert!(!scope.default_authorization);
    assert_eq!(scope.find_activities("orders", "read").count(), 0);
}

// ============================================================================
// HOT RELOAD
// ============================================================================

#[tokio::test]
async fn test_reload_while_resolving() {
    init_tracing();
    let handle = Arc::new(ScopeHandle::from_section(Some(&shop_section())));
    let mut tasks = JoinSet::new();

    for i in 0..16 {
        let handle = Arc::clone(&handle);
        tasks.spawn(async move {
            let scope = handle.load();
            let resource = format!("orders/{}", i);
            names(scope.find_activities(&resource, "update"))
        });
    }

    let mut reduced = shop_section();
    reduced.activities.retain(|element| element.name != "orders.update");
    let previous = handle.reload(Some(&reduced));
    assert_eq!(previous.activities.len(), 5);

    while let Some(result) = tasks.join_next().await {
        let found = result.unwrap();
        let full = vec!["orders.update", "orders", "shop"];
        let trimmed = vec!["orders", "shop"];
        assert!(found == full || found == trimmed, "unexpected snapshot: {:?}", found);
    }

    let current = handle.load();
    assert_eq!(names(current.find_activities("orders/1", "update")), vec!["orders", "shop"]);
}
