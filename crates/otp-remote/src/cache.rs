//! Session document cache using moka
//!
//! Fetched documents are cached by `(locator, type)`. Concurrent requests for
//! the same key share one in-flight initialization: the first caller runs the
//! fetch, later callers wait and receive its result. Failures are handed to
//! every waiter and are not cached.
//!
//! The cache is unbounded. A session lives for one load, and an evicted
//! entry would be fetched a second time.

use crate::locator::Locator;
use moka::future::Cache;
use std::any::{Any, TypeId};
use std::future::Future;
use std::sync::Arc;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Type-aware cache key
///
/// The same URL requested as two different types is two entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedCacheKey {
    locator: Locator,
    type_id: TypeId,
}

impl TypedCacheKey {
    /// Create typed key for a document type
    #[inline]
    #[must_use]
    pub fn new<T: Any>(locator: Locator) -> Self {
        Self {
            locator,
            type_id: TypeId::of::<T>(),
        }
    }

    /// Get locator
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Get type ID
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// Typed document cache for one resolution session
#[derive(Debug, Clone)]
pub struct DocumentCache {
    inner: Cache<TypedCacheKey, Arc<dyn Any + Send + Sync>>,
}

impl DocumentCache {
    /// Create new unbounded cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Get a cached document
    ///
    /// Returns `None` when nothing of type `T` is cached under the locator.
    pub async fn get<T>(&self, locator: &Locator) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
    {
        let key = TypedCacheKey::new::<T>(locator.clone());
        self.inner
            .get(&key)
            .await
            .and_then(|entry| entry.downcast_ref::<T>().cloned())
    }

    /// Get a cached document or compute it with single-flight semantics
    ///
    /// `init` runs at most once per key at a time. Waiting callers receive the
    /// same error as the caller that ran it. The outer `Option` is `None` only
    /// if the stored entry is not a `T`.
    ///
    /// # Errors
    /// The shared error produced by `init`.
    pub async fn try_get_or_insert_with<T, E, Fut>(
        &self,
        locator: &Locator,
        init: Fut,
    ) -> Result<Option<T>, Arc<E>>
    where
        T: Any + Clone + Send + Sync,
        E: Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = TypedCacheKey::new::<T>(locator.clone());
        let entry = self
            .inner
            .try_get_with(key, async move {
                let value = init.await?;
                Ok::<_, E>(Arc::new(value) as Arc<dyn Any + Send + Sync>)
            })
            .await?;

        Ok(entry.downcast_ref::<T>().cloned())
    }

    /// Check if a document of type `T` is cached under the locator
    #[inline]
    #[must_use]
    pub fn contains<T: Any>(&self, locator: &Locator) -> bool {
        self.inner
            .contains_key(&TypedCacheKey::new::<T>(locator.clone()))
    }

    /// Get cache statistics
    ///
    /// Flushes pending maintenance first so the count is exact.
    pub async fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks().await;
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}
