//! Read-through memoization over a [`CacheStore`]

use std::any::type_name;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{CacheStore, CachedValue};
use crate::error::{AuthzError, Result};

/// Return the value cached under `key`, or create, store and return it
///
/// `creator` runs only when no live entry exists. Its error is returned
/// unchanged and nothing is stored. Two callers missing at the same time
/// both run their creator; the last `set` wins.
///
/// # Examples
///
/// ```
/// use activity_authz::cache::{get_or_create, MemoryCache};
/// use chrono::{Duration, Utc};
///
/// # tokio_test::block_on(async {
/// let cache = MemoryCache::new();
/// let expires = Utc::now() + Duration::minutes(5);
///
/// let value: u32 = get_or_create(&cache, "answer", || async { Ok(42) }, expires, None)
///     .await
///     .unwrap();
/// assert_eq!(value, 42);
/// # });
/// ```
pub async fn get_or_create<T, F, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    creator: F,
    absolute_expiration: DateTime<Utc>,
    region: Option<&str>,
) -> Result<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let Some(value) = cached(cache, key, region).await? {
        return downcast(key, value);
    }

    debug!(key = %key, "Cache miss, creating value");
    let value = creator().await?;
    cache
        .set(key, Arc::new(value.clone()), absolute_expiration, region)
        .await?;

    Ok(value)
}

/// Live cached entry for `key`, if any
///
/// An entry can expire between `contains` and `get`; that reads as a miss.
pub(crate) async fn cached(
    cache: &dyn CacheStore,
    key: &str,
    region: Option<&str>,
) -> Result<Option<CachedValue>> {
    if !cache.contains(key, region).await? {
        return Ok(None);
    }

    let value = cache.get(key, region).await?;
    if value.is_some() {
        debug!(key = %key, "Cache hit");
    }
    Ok(value)
}

/// Recover a concrete value from a type-erased entry
pub(crate) fn downcast<T>(key: &str, value: CachedValue) -> Result<T>
where
    T: Clone + Send + Sync + 'static,
{
    match value.downcast::<T>() {
        Ok(value) => Ok(T::clone(&value)),
        Err(_) => {
            warn!(key = %key, expected = type_name::<T>(), "Cached value has unexpected type");
            Err(AuthzError::CacheTypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
        }
    }
}
