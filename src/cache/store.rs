//! In-memory response store with lazy TTL expiry.

use std::{
    collections::{HashMap, hash_map},
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;
use tracing::debug;

use super::CacheKey;
use crate::http::Response;

/// A stored response together with its freshness window.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Response,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Wraps a response for insertion.
    ///
    /// The creation time recorded here is provisional; [`CacheStore::set`]
    /// restamps it at the moment of insertion.
    pub fn new(value: Response, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn value(&self) -> &Response {
        &self.value
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Time elapsed since creation, as observed at `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// An entry is stale once its age strictly exceeds its TTL.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) > self.ttl
    }
}

/// Keyed store of cached responses.
///
/// Operations are synchronous and hold the internal lock only for their own
/// duration, so the store can be shared across tasks behind an
/// [`Arc`](std::sync::Arc) without being held across an `.await`.
///
/// Expiry is lazy: a stale entry stays in the map until the next
/// [`get`](Self::get) for its key, or an explicit [`remove`](Self::remove) or
/// [`clear`](Self::clear).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcache::{Response, StatusCode, cache::{CacheEntry, CacheStore}};
///
/// let store = CacheStore::new();
/// let first = Response::new(StatusCode::Ok).body("first");
/// let second = Response::new(StatusCode::Ok).body("second");
///
/// assert!(store.set("/a", CacheEntry::new(first, Duration::from_secs(60))));
/// assert!(!store.set("/a", CacheEntry::new(second, Duration::from_secs(60))));
/// assert_eq!(store.get("/a").unwrap().text().unwrap(), "first");
/// ```
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every operation leaves the map consistent, so a poisoned lock is still usable.
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `entry` under `key` unless the key is already present.
    ///
    /// An existing entry is never replaced, even when it is stale. On
    /// insertion the entry's creation time is set to now, whatever the caller
    /// supplied. Returns `true` if the entry was inserted.
    pub fn set(&self, key: impl Into<CacheKey>, mut entry: CacheEntry) -> bool {
        match self.entries().entry(key.into()) {
            hash_map::Entry::Occupied(slot) => {
                debug!(key = %slot.key(), "key already cached; keeping existing entry");
                false
            }
            hash_map::Entry::Vacant(slot) => {
                entry.created_at = Instant::now();
                debug!(key = %slot.key(), ttl = ?entry.ttl, "cache entry stored");
                slot.insert(entry);
                true
            }
        }
    }

    /// Returns a copy of the stored response if the entry is still fresh.
    ///
    /// A stale entry is removed as a side effect and `None` is returned.
    pub fn get(&self, key: &str) -> Option<Response> {
        let mut entries = self.entries();
        let now = Instant::now();

        if entries.get(key)?.is_expired_at(now) {
            entries.remove(key);
            debug!(key, "cache entry expired");
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Deletes the entry for `key`, if any.
    pub fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    /// Deletes every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Returns `true` if an entry exists for `key`, fresh or stale.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Number of entries held, including stale ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
