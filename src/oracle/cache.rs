//! Cache storage contract, its in-memory implementation and the module
//! cache wrapper shared by every Oracle service in a container.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::error::DiResult;

/// Value stored in a [`CacheStorage`].
pub type CacheValue = Arc<dyn Any + Send + Sync>;

/// Storage contract the module cache is built on.
///
/// Registered as a shared singleton; the first registration in a container
/// wins, so an application can install its own storage before loading any
/// Oracle module.
pub trait CacheStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheValue>;
    fn set(&self, key: String, value: CacheValue);
    fn remove(&self, key: &str);
    /// Number of live entries.
    fn entry_count(&self) -> u64;
}

/// Sizing for the [`MemoryCache`] created when no storage is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    pub max_capacity: u64,
    pub time_to_live: Option<Duration>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live: None,
        }
    }
}

/// In-process [`CacheStorage`] backed by a moka cache.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, CacheValue>,
}

impl MemoryCache {
    pub fn new(options: CacheOptions) -> Self {
        let mut builder = Cache::builder().max_capacity(options.max_capacity);
        if let Some(ttl) = options.time_to_live {
            builder = builder.time_to_live(ttl);
        }
        Self { inner: builder.build() }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl CacheStorage for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheValue> {
        self.inner.get(key)
    }

    fn set(&self, key: String, value: CacheValue) {
        self.inner.insert(key, value);
    }

    fn remove(&self, key: &str) {
        self.inner.invalidate(key);
    }

    fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

const KEY_PREFIX: &str = "servfor:";

/// Typed, namespaced view over the shared [`CacheStorage`].
///
/// Every Oracle service in a container holds the same `OracleCache`, so
/// values memoized by one keyed service are visible to the others.
///
/// ```
/// use servfor_di::{MemoryCache, OracleCache};
/// use std::sync::Arc;
///
/// let cache = OracleCache::create(Arc::new(MemoryCache::default()));
/// let first = cache.get_or_insert_with("answer", || 42u32);
/// let second = cache.get_or_insert_with("answer", || 0u32);
/// assert_eq!(*second, 42);
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Clone)]
pub struct OracleCache {
    storage: Arc<dyn CacheStorage>,
}

impl OracleCache {
    pub fn create(storage: Arc<dyn CacheStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    fn namespaced(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }

    /// Returns the value under `key` if present and of type `T`.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.storage
            .get(&Self::namespaced(key))
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn set<T: Send + Sync + 'static>(&self, key: &str, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.storage.set(Self::namespaced(key), value.clone());
        value
    }

    pub fn get_or_insert_with<T, F>(&self, key: &str, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        match self.get::<T>(key) {
            Some(value) => value,
            None => self.set(key, init()),
        }
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with); failures are
    /// returned and nothing is cached.
    pub fn try_get_or_insert_with<T, F>(&self, key: &str, init: F) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> DiResult<T>,
    {
        if let Some(value) = self.get::<T>(key) {
            return Ok(value);
        }
        Ok(self.set(key, init()?))
    }

    pub fn remove(&self, key: &str) {
        self.storage.remove(&Self::namespaced(key));
    }
}

impl fmt::Debug for OracleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;

    #[test]
    fn values_are_namespaced_in_storage() {
        let storage = Arc::new(MemoryCache::default());
        let cache = OracleCache::create(storage.clone());

        cache.set("schema", "HR".to_string());
        assert!(storage.get("schema").is_none());
        assert!(storage.get("servfor:schema").is_some());
        assert_eq!(storage.entry_count(), 1);
    }

    #[test]
    fn get_with_wrong_type_is_none() {
        let cache = OracleCache::create(Arc::new(MemoryCache::default()));
        cache.set("n", 7u32);
        assert!(cache.get::<String>("n").is_none());
        assert_eq!(*cache.get::<u32>("n").unwrap(), 7);
    }

    #[test]
    fn failed_initializer_caches_nothing() {
        let cache = OracleCache::create(Arc::new(MemoryCache::default()));
        let err = cache
            .try_get_or_insert_with::<u32, _>("n", || Err(DiError::InvalidConnectionString("bad".into())))
            .unwrap_err();
        assert!(matches!(err, DiError::InvalidConnectionString(_)));
        assert!(cache.get::<u32>("n").is_none());

        cache.remove("n");
        assert_eq!(*cache.try_get_or_insert_with("n", || Ok(3u32)).unwrap(), 3);
    }

    #[test]
    fn memory_cache_respects_capacity_option() {
        let storage = MemoryCache::new(CacheOptions { max_capacity: 1, time_to_live: None });
        storage.set("a".into(), Arc::new(1u8));
        storage.set("b".into(), Arc::new(2u8));
        assert!(storage.entry_count() <= 1);
    }
}
