//! Windowed concurrent aggregation store.
//!
//! Records are accumulated into per-timestamp buckets held in a sharded
//! concurrent map. Buckets older than the trailing window are removed
//! lazily: every ingest and snapshot runs the eviction sweep, so staleness
//! is bounded by call frequency rather than a background timer.

use crate::core::snapshot::Snapshot;
use crate::event::Event;
use dashmap::DashMap;
use std::time::Duration;

/// Default trailing retention window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Per-timestamp accumulator.
///
/// Created on the first insert for a key; later inserts sharing the key
/// merge additively. `y_sum` is 64-bit: `y` values approach 2^31, so a
/// 32-bit accumulator would overflow after a handful of merges.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub x_sum: f64,
    pub y_sum: i64,
    pub count: u64,
}

impl Bucket {
    fn from_event(event: &Event) -> Self {
        Self {
            x_sum: event.x,
            y_sum: event.y,
            count: 1,
        }
    }

    fn merge(&mut self, event: &Event) {
        self.x_sum += event.x;
        self.y_sum += event.y;
        self.count += 1;
    }
}

/// Concurrent mapping from exact event timestamp to its aggregate bucket.
///
/// Keys are exact timestamps: distinct timestamps always land in distinct
/// buckets. Merges into one key serialize on that key's map shard, so two
/// concurrent inserts with the same timestamp are both reflected in the
/// final bucket; inserts into different keys proceed without mutual
/// exclusion and there is no store-wide lock.
#[derive(Debug)]
pub struct WindowedStore {
    window_ms: i64,
    buckets: DashMap<i64, Bucket>,
}

impl WindowedStore {
    /// Create a store with the default 60-second window.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Create a store with a custom trailing window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis() as i64,
            buckets: DashMap::new(),
        }
    }

    /// Merge a validated record into its timestamp bucket.
    ///
    /// A record aged past the window at ingest time is silently dropped;
    /// aging out is not an error.
    pub fn ingest(&self, event: Event, now_ms: i64) {
        if event.age_ms(now_ms) >= self.window_ms {
            tracing::debug!(timestamp = event.timestamp, "dropping aged-out record");
            return;
        }
        self.evict(now_ms);

        // The entry handle holds the shard write lock across the whole
        // read-modify-write, so same-key merges cannot lose updates.
        self.buckets
            .entry(event.timestamp)
            .and_modify(|bucket| bucket.merge(&event))
            .or_insert_with(|| Bucket::from_event(&event));
    }

    /// Fold all live buckets into a point-in-time [`Snapshot`].
    ///
    /// Reads never destroy buckets beyond the eviction sweep; calling this
    /// twice without an intervening insert or time advance yields identical
    /// results.
    pub fn snapshot(&self, now_ms: i64) -> Snapshot {
        self.evict(now_ms);

        let mut count = 0u64;
        let mut x_sum = 0.0f64;
        let mut y_sum = 0i64;
        for bucket in self.buckets.iter() {
            count += bucket.count;
            x_sum += bucket.x_sum;
            y_sum += bucket.y_sum;
        }
        Snapshot::from_sums(count, x_sum, y_sum)
    }

    /// Remove every bucket aged past the window.
    ///
    /// Liveness is uniform with ingest: a bucket stays exactly as long as a
    /// record with its timestamp would still be accepted.
    pub fn evict(&self, now_ms: i64) {
        self.buckets
            .retain(|&timestamp, _| now_ms - timestamp < self.window_ms);
    }

    /// Number of distinct live timestamps currently held.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The configured trailing window.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms as u64)
    }
}

impl Default for WindowedStore {
    fn default() -> Self {
        Self::new()
    }
}
