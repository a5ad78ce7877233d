use crate::domain::market::Series;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Source of "now" for TTL checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identity of a forecasting request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint {
    pub symbol: String,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub bars: usize,
    pub horizon: usize,
}

impl RequestFingerprint {
    pub fn new(symbol: impl Into<String>, series: &Series, horizon: usize) -> Self {
        Self {
            symbol: symbol.into(),
            first_timestamp: series.bars().first().map(|b| b.timestamp),
            last_timestamp: series.last().map(|b| b.timestamp),
            bars: series.len(),
            horizon,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Keyed memo of request results with a time-to-live.
///
/// Owned by the caller and passed explicitly; there is no shared instance.
pub struct ForecastCache<V, C: Clock = SystemClock> {
    entries: HashMap<RequestFingerprint, CachedEntry<V>>,
    ttl: Duration,
    clock: C,
}

impl<V, C: Clock> std::fmt::Debug for ForecastCache<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<V: Clone> ForecastCache<V, SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<V: Clone, C: Clock> ForecastCache<V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &CachedEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.ttl
    }

    /// Fresh value for `key`. Expired entries are evicted and count as a miss.
    pub fn get(&mut self, key: &RequestFingerprint) -> Option<V> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if self.is_fresh(entry, now) {
            debug!("ForecastCache: hit for {}", key.symbol);
            return Some(entry.value.clone());
        }
        debug!("ForecastCache: expired entry for {}", key.symbol);
        self.entries.remove(key);
        None
    }

    pub fn insert(&mut self, key: RequestFingerprint, value: V) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CachedEntry { value, stored_at });
    }

    /// Returns the cached value or computes, stores and returns a new one.
    /// Failures are passed through and nothing is stored.
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        key: RequestFingerprint,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        debug!("ForecastCache: miss for {}", key.symbol);
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn invalidate(&mut self, key: &RequestFingerprint) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
