use std::borrow::Borrow;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use kindernav_core::AppResult;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Lifetime of every cache entry in the engine.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < CACHE_TTL
    }
}

/// Time-bounded memoization map.
///
/// Entries expire lazily: an expired entry is dropped by the lookup that
/// finds it, there is no background sweep. Concurrent misses on one key are
/// not coalesced; each caller fetches and the last insert wins.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if it is younger than [`CACHE_TTL`].
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_fresh() => return Some(entry.data.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_fresh()) {
            entries.remove(key);
        }

        None
    }

    /// Returns whether a fresh entry exists for `key`.
    pub async fn is_valid<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(CacheEntry::is_fresh)
    }

    /// Stores `value` stamped with the current time.
    pub async fn insert(&self, key: K, value: V) {
        self.entries.write().await.insert(
            key,
            CacheEntry {
                data: value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value or runs `fetcher` and caches its result.
    ///
    /// Fetch errors are returned as-is and leave the cache untouched, so the
    /// next call fetches again. No lock is held while `fetcher` runs.
    pub async fn get_or_try_fetch<F, Fut>(&self, key: K, fetcher: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Removes one entry. Returns whether an entry was present.
    pub async fn invalidate<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.write().await.remove(key).is_some()
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Returns the number of fresh entries.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_fresh())
            .count()
    }

    /// Returns whether no fresh entry exists.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
