//! Error types for activity resolution and scope caching

use thiserror::Error;

/// Activity authorization errors
///
/// Matching and building are total over their inputs, so every variant here
/// originates from the cache layer or from a caller-supplied scope source.
/// The crate itself raises `InvalidInput` and `CacheTypeMismatch`;
/// `CacheError` is for [`CacheStore`](crate::cache::CacheStore) implementors
/// and `SourceError` for scope sources passed to
/// [`ScopeResolver`](crate::scope::ScopeResolver). Both pass through
/// unchanged.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A cached value exists under the key but holds another type
    #[error("Cached value for '{key}' is not a {expected}")]
    CacheTypeMismatch {
        /// Cache key that was read
        key: String,
        /// Type the caller asked for
        expected: &'static str,
    },

    /// Backing cache store failure, raised by `CacheStore` implementations
    #[error("Cache error: {0}")]
    CacheError(String),

    /// The scope source failed to produce a configuration section, raised
    /// by caller-supplied sources
    #[error("Scope source error: {0}")]
    SourceError(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
