//! Memoizing cache wrapper
//!
//! [`get_or_create`] is a read-through helper over any [`CacheStore`]: it
//! returns the cached value when present and otherwise awaits a creator,
//! stores its result with an absolute expiration and returns it. It does not
//! coalesce concurrent misses; use [`SingleFlight`] when one creator
//! invocation per key is required.

mod memoize;
mod memory;
mod single_flight;

pub use memoize::get_or_create;
pub use memory::{CacheStats, MemoryCache};
pub use single_flight::SingleFlight;

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Type-erased cached value
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// Backing store for memoized values
///
/// Keys are scoped by an optional region. Implementations decide how expiry
/// is enforced, but an entry must not be reported as present after its
/// absolute expiration.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether a live entry exists for `key`
    async fn contains(&self, key: &str, region: Option<&str>) -> Result<bool>;

    /// Get the live entry for `key`
    async fn get(&self, key: &str, region: Option<&str>) -> Result<Option<CachedValue>>;

    /// Store `value` under `key` until `absolute_expiration`, replacing any entry
    async fn set(
        &self,
        key: &str,
        value: CachedValue,
        absolute_expiration: DateTime<Utc>,
        region: Option<&str>,
    ) -> Result<()>;

    /// Remove the entry for `key`, returning it if it was live
    async fn remove(&self, key: &str, region: Option<&str>) -> Result<Option<CachedValue>>;
}
