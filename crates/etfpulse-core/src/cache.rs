//! Expiring in-memory cache of fetched price frames.
//!
//! Entries are keyed by instrument set and fetch start date. Concurrent
//! callers for the same key share one upstream fetch; a failed fetch leaves
//! nothing behind so the next caller retries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use time::Date;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::{PriceFrame, SourceError};

/// Default time-to-live: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3_600);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub set: String,
    pub start: Date,
}

impl CacheKey {
    pub fn new(set: impl Into<String>, start: Date) -> Self {
        Self {
            set: set.into(),
            start,
        }
    }
}

/// A frame returned by the cache, with whether it came from a prior fetch.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub frame: Arc<PriceFrame>,
    pub hit: bool,
}

#[derive(Debug)]
struct CacheEntry {
    frame: Arc<PriceFrame>,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct Slot {
    cell: OnceCell<CacheEntry>,
}

/// Thread-safe expiring memo shared by every dashboard request.
#[derive(Debug, Clone)]
pub struct PriceCache {
    slots: Arc<Mutex<HashMap<CacheKey, Arc<Slot>>>>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }

    /// Return the cached frame for `key`, or run `fetch` and store its result.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error; errors are never cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: CacheKey,
        fetch: F,
    ) -> Result<CacheLookup, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PriceFrame, SourceError>>,
    {
        if self.is_disabled() {
            let frame = fetch().await?;
            return Ok(CacheLookup {
                frame: Arc::new(frame),
                hit: false,
            });
        }

        let slot = {
            let mut slots = self.slots.lock().await;
            let expired = slots
                .get(&key)
                .and_then(|slot| slot.cell.get())
                .is_some_and(|entry| entry.stored_at.elapsed() >= self.ttl);
            if expired {
                debug!(set = %key.set, start = %key.start, "price cache entry expired");
                slots.remove(&key);
            }
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let fetched = AtomicBool::new(false);
        let fetched_flag = &fetched;
        let entry = slot
            .cell
            .get_or_try_init(|| async move {
                fetched_flag.store(true, Ordering::Relaxed);
                let frame = fetch().await?;
                Ok::<_, SourceError>(CacheEntry {
                    frame: Arc::new(frame),
                    stored_at: Instant::now(),
                })
            })
            .await?;

        let hit = !fetched.load(Ordering::Relaxed);
        debug!(set = %key.set, start = %key.start, hit, "price cache lookup");
        Ok(CacheLookup {
            frame: Arc::clone(&entry.frame),
            hit,
        })
    }

    /// Drop expired entries and abandoned empty slots.
    pub async fn clear_expired(&self) {
        let mut slots = self.slots.lock().await;
        slots.retain(|_, slot| match slot.cell.get() {
            Some(entry) => entry.stored_at.elapsed() < self.ttl,
            None => Arc::strong_count(slot) > 1,
        });
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    /// Number of stored frames, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.slots
            .lock()
            .await
            .values()
            .filter(|slot| slot.cell.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
