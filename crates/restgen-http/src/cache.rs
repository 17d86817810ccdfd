//! In-memory response cache and the caching transport built on it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt as _;
use moka::sync::Cache;
use restgen::{Reply, SharedParser, Transport};
use serde_json::Value;

use crate::client::apply_parser;

/// Thread-safe URL-keyed cache of JSON responses, backed by [`moka`].
///
/// Entries expire after the configured time-to-live (never, by default).
/// With a capacity set, the cache evicts entries once it grows past it.
///
/// ```
/// use std::time::Duration;
/// use restgen_http::MemCacheProvider;
///
/// let cache = MemCacheProvider::new()
///     .with_ttl(Duration::from_secs(60))
///     .with_capacity(2);
/// cache.put("a", serde_json::json!(1));
/// assert_eq!(cache.get("a"), Some(serde_json::json!(1)));
/// ```
pub struct MemCacheProvider {
    ttl: Option<Duration>,
    capacity: Option<u64>,
    entries: Cache<String, Value>,
    /// Bumped by every invalidation.
    generation: AtomicU64,
}

impl Default for MemCacheProvider {
    fn default() -> Self {
        Self::build(None, None)
    }
}

impl MemCacheProvider {
    /// Unbounded cache whose entries never expire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire entries `ttl` after they were stored.
    #[must_use]
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self::build(Some(ttl), self.capacity)
    }

    /// Keep at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(self, capacity: usize) -> Self {
        let capacity = u64::try_from(capacity).unwrap_or(u64::MAX);
        Self::build(self.ttl, Some(capacity))
    }

    fn build(ttl: Option<Duration>, capacity: Option<u64>) -> Self {
        let mut builder = Cache::builder();
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        if let Some(capacity) = capacity {
            builder = builder.max_capacity(capacity);
        }
        Self {
            ttl,
            capacity,
            entries: builder.build(),
            generation: AtomicU64::new(0),
        }
    }

    /// The cached value for `key`, unless missing or expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(&key.to_owned())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Drop the entry for `key`, if any.
    pub fn invalidate(&self, key: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.invalidate(&key.to_owned());
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.invalidate_all();
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        usize::try_from(self.entries.entry_count()).unwrap_or(usize::MAX)
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store `value` only if nothing was invalidated since `seen` was read.
    pub(crate) fn put_if_unchanged(&self, key: String, value: Value, seen: u64) -> bool {
        if self.generation() != seen {
            return false;
        }
        self.entries.insert(key, value);
        true
    }
}

impl fmt::Debug for MemCacheProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemCacheProvider")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

/// Transport that serves repeated `GET`s from a [`MemCacheProvider`].
///
/// Successful `GET` responses are cached by URL before any parser runs, and
/// the caller's parser is applied on every hit, so methods sharing a URL
/// with different parsers each see their own result. `POST`, `PUT`, `DELETE`
/// and `MULTIPART` calls go to the inner transport and invalidate the entry
/// for their URL. `JSONP` is never cached. Failures are never cached.
///
/// A `GET` still in flight when any entry is invalidated does not store its
/// response.
#[derive(Debug)]
pub struct MemCacheTransport<T> {
    inner: T,
    cache: Arc<MemCacheProvider>,
}

impl<T: Transport> MemCacheTransport<T> {
    /// Cache `inner`'s `GET` results in `cache`.
    pub const fn new(inner: T, cache: Arc<MemCacheProvider>) -> Self {
        Self { inner, cache }
    }

    /// The cache backing this transport.
    #[must_use]
    pub const fn cache(&self) -> &Arc<MemCacheProvider> {
        &self.cache
    }

    /// The wrapped transport.
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for MemCacheTransport<T> {
    fn get(&self, url: String, parser: Option<SharedParser>) -> Reply {
        if let Some(value) = self.cache.get(&url) {
            tracing::trace!(%url, "cache hit");
            return futures::future::ready(apply_parser(url, value, parser.as_ref())).boxed();
        }
        tracing::trace!(%url, "cache miss");

        let cache = Arc::clone(&self.cache);
        let seen = cache.generation();
        let reply = self.inner.get(url.clone(), None);
        async move {
            let value = reply.await?;
            if !cache.put_if_unchanged(url.clone(), value.clone(), seen) {
                tracing::trace!(%url, "invalidated while in flight, not cached");
            }
            apply_parser(url, value, parser.as_ref())
        }
        .boxed()
    }

    fn post(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        self.cache.invalidate(&url);
        self.inner.post(url, body, parser)
    }

    fn put(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        self.cache.invalidate(&url);
        self.inner.put(url, body, parser)
    }

    fn delete(&self, url: String, parser: Option<SharedParser>) -> Reply {
        self.cache.invalidate(&url);
        self.inner.delete(url, parser)
    }

    fn jsonp(&self, url: String, parser: Option<SharedParser>) -> Reply {
        self.inner.jsonp(url, parser)
    }

    fn multipart(&self, url: String, body: Option<Value>, parser: Option<SharedParser>) -> Reply {
        self.cache.invalidate(&url);
        self.inner.multipart(url, body, parser)
    }
}
