/// Activity lookup and memoized scope resolution
///
/// [`find_activities`] walks the candidate names of a request against a
/// registry. [`ScopeResolver`] memoizes built scopes in a [`CacheStore`] so
/// the configuration source is consulted once per TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activity::ActivityRegistry;
use crate::cache::{get_or_create, CacheStore, CachedValue, SingleFlight};
use crate::config::ActivityAuthorizationSection;
use crate::error::{AuthzError, Result};
use crate::matcher::{candidates, ActivityNames};
use crate::types::Activity;

use super::handle::ScopeHandle;
use super::types::{build_scope, AuthorizationScope};

/// Default scope TTL (5 minutes)
const DEFAULT_SCOPE_TTL_SECS: u64 = 300;

/// Find every activity governing `resource`/`action`
///
/// Yields registry entries in candidate order, most specific first, then the
/// default activity if it is named and present. The default is yielded even
/// when a candidate already produced it. Pure over its inputs: calling again
/// gives the same sequence.
pub fn find_activities<'a>(
    registry: &'a ActivityRegistry,
    resource: &'a str,
    action: &'a str,
    default_activity: Option<&'a str>,
) -> FindActivities<'a> {
    FindActivities {
        registry,
        names: candidates(resource, action),
        default_activity,
    }
}

/// Lazy iterator returned by [`find_activities`]
#[derive(Debug, Clone)]
pub struct FindActivities<'a> {
    registry: &'a ActivityRegistry,
    names: ActivityNames<'a>,
    default_activity: Option<&'a str>,
}

impl<'a> Iterator for FindActivities<'a> {
    type Item = &'a Activity;

    fn next(&mut self) -> Option<&'a Activity> {
        let registry = self.registry;

        for name in self.names.by_ref() {
            if let Some(activity) = registry.get(&name) {
                debug!(activity = %name, "Matched activity");
                return Some(activity);
            }
        }

        let name = self.default_activity.take().filter(|name| !name.is_empty())?;
        let activity = registry.get(name);
        if activity.is_some() {
            debug!(activity = %name, "Falling back to default activity");
        }
        activity
    }
}

/// Scope resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Prefix prepended to the scope name to form the cache key
    pub key_prefix: String,

    /// Cache region holding built scopes
    pub region: Option<String>,

    /// Seconds a built scope stays cached
    pub scope_ttl_secs: u64,

    /// Coalesce concurrent misses for the same scope into one build
    pub coalesce: bool,
}

impl ResolverConfig {
    /// Scope TTL as a duration
    pub fn scope_ttl(&self) -> Duration {
        Duration::from_secs(self.scope_ttl_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            key_prefix: "authz:scope:".to_string(),
            region: None,
            scope_ttl_secs: DEFAULT_SCOPE_TTL_SECS,
            coalesce: false,
        }
    }
}

/// Resolves activities through memoized authorization scopes
///
/// Scopes are built from a caller-supplied source and cached under
/// `key_prefix + name` with an absolute expiration of now + TTL. Without
/// `coalesce`, concurrent misses may each invoke the source and the last
/// write wins.
///
/// The resolver also holds a [`ScopeHandle`] with the scope installed by the
/// last [`reload`](ScopeResolver::reload). A reload writes the new scope
/// through to the cache, so memoized lookups by name see it too, while
/// snapshots taken before the reload keep matching against the old one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use activity_authz::cache::MemoryCache;
/// use activity_authz::config::{ActivityAuthorizationSection, ActivityElement};
/// use activity_authz::scope::ScopeResolver;
///
/// # tokio_test::block_on(async {
/// let resolver = ScopeResolver::new(Arc::new(MemoryCache::new()));
/// let section = ActivityAuthorizationSection {
///     name: "orders".to_string(),
///     activities: vec![ActivityElement::named("orders.read")],
///     ..Default::default()
/// };
///
/// let found = resolver
///     .resolve_activities("orders", "orders/7", "read", || async { Ok(Some(section)) })
///     .await
///     .unwrap();
/// assert_eq!(found[0].name(), "orders.read");
/// # });
/// ```
pub struct ScopeResolver {
    /// Backing store for built scopes
    cache: Arc<dyn CacheStore>,
    /// In-flight builds, used when `coalesce` is set
    flights: SingleFlight,
    /// Scope installed by the last reload
    current: ScopeHandle,
    config: ResolverConfig,
}

impl ScopeResolver {
    /// Create a resolver with default configuration
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self::with_config(cache, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration
    pub fn with_config(cache: Arc<dyn CacheStore>, config: ResolverConfig) -> Self {
        Self {
            cache,
            flights: SingleFlight::new(),
            current: ScopeHandle::default(),
            config,
        }
    }

    /// Resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Cache key for a scope name
    pub fn cache_key(&self, name: &str) -> String {
        format!("{}{}", self.config.key_prefix, name)
    }

    /// Get the scope named `name`, building it from `source` on a miss
    ///
    /// `source` yields the configuration section; `None` builds an empty
    /// scope. A source error is returned and nothing is cached.
    pub async fn scope<F, Fut>(&self, name: &str, source: F) -> Result<Arc<AuthorizationScope>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<ActivityAuthorizationSection>>>,
    {
        let key = self.cache_key(name);
        let expiration = self.expiration()?;
        let region = self.config.region.as_deref();

        let creator = || async move {
            let section = source().await?;
            Ok::<_, AuthzError>(Arc::new(build_scope(section.as_ref())))
        };

        if self.config.coalesce {
            self.flights
                .get_or_create(self.cache.as_ref(), &key, creator, expiration, region)
                .await
        } else {
            get_or_create(self.cache.as_ref(), &key, creator, expiration, region).await
        }
    }

    /// Activities governing `resource`/`action` in the scope named `name`
    ///
    /// Returns an owned snapshot in priority order, default activity last.
    pub async fn resolve_activities<F, Fut>(
        &self,
        name: &str,
        resource: &str,
        action: &str,
        source: F,
    ) -> Result<Vec<Activity>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<ActivityAuthorizationSection>>>,
    {
        let scope = self.scope(name, source).await?;
        let found: Vec<Activity> = scope.find_activities(resource, action).cloned().collect();

        debug!(
            scope = %name,
            resource = %resource,
            action = %action,
            matches = found.len(),
            "Resolved activities"
        );

        Ok(found)
    }

    /// Snapshot of the scope installed by the last reload
    ///
    /// Empty until the first reload.
    pub fn current(&self) -> Arc<AuthorizationScope> {
        self.current.load()
    }

    /// Activities governing `resource`/`action` in the current scope
    ///
    /// Returns an owned snapshot in priority order, default activity last.
    pub fn find_activities(&self, resource: &str, action: &str) -> Vec<Activity> {
        self.current()
            .find_activities(resource, action)
            .cloned()
            .collect()
    }

    /// Rebuild the scope from `section` and make it current
    ///
    /// The new scope is cached under its own name, replacing any memoized
    /// copy, and then swapped into the handle. Returns the scope it
    /// replaced. On a cache error nothing is swapped.
    pub async fn reload(
        &self,
        section: Option<&ActivityAuthorizationSection>,
    ) -> Result<Arc<AuthorizationScope>> {
        let scope = Arc::new(build_scope(section));
        let key = self.cache_key(&scope.name);
        let expiration = self.expiration()?;

        let cached: CachedValue = Arc::new(Arc::clone(&scope));
        self.cache
            .set(&key, cached, expiration, self.config.region.as_deref())
            .await?;

        info!(
            scope = %scope.name,
            activities = scope.activities.len(),
            "Reloaded authorization scope"
        );

        Ok(self.current.install(scope))
    }

    /// Drop the cached scope so the next lookup rebuilds it
    pub async fn invalidate(&self, name: &str) -> Result<()> {
        let key = self.cache_key(name);
        self.cache.remove(&key, self.config.region.as_deref()).await?;
        debug!(scope = %name, "Invalidated cached scope");
        Ok(())
    }

    fn expiration(&self) -> Result<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(self.config.scope_ttl())
            .map_err(|e| AuthzError::InvalidInput(format!("Scope TTL out of range: {}", e)))?;

        Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthzError::InvalidInput("Scope TTL overflows expiration".to_string()))
    }
}
