//! Coalescing of concurrent cache misses
//!
//! [`SingleFlight`] tracks one pending creation per key. Callers that miss
//! while a creation is running await its result instead of starting their
//! own. If the running creator fails, its callers get the error and the
//! next waiter retries with its own creator.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use super::memoize::{cached, downcast};
use super::{CacheStore, CachedValue};
use crate::error::{AuthzError, Result};

/// Per-key in-flight creation tracker
#[derive(Default)]
pub struct SingleFlight {
    in_flight: DashMap<String, Arc<OnceCell<CachedValue>>>,
}

impl SingleFlight {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of creations currently running
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Like [`get_or_create`](super::get_or_create), but concurrent misses
    /// for the same key share a single creator invocation
    pub async fn get_or_create<T, F, Fut>(
        &self,
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

        let flight_key = match region {
            Some(region) => format!("{}\u{0}{}", region, key),
            None => key.to_string(),
        };
        let cell = self
            .in_flight
            .entry(flight_key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let outcome = cell
            .get_or_try_init(|| async {
                debug!(key = %key, "Cache miss, creating value for all waiters");
                let value: CachedValue = Arc::new(creator().await?);
                cache
                    .set(key, Arc::clone(&value), absolute_expiration, region)
                    .await?;
                Ok::<_, AuthzError>(value)
            })
            .await
            .map(|value| Arc::clone(value));

        self.in_flight
            .remove_if(&flight_key, |_, pending| Arc::ptr_eq(pending, &cell));

        downcast(key, outcome?)
    }
}
