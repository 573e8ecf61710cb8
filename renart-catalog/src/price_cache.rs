use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Where a cached price-per-gram came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedPrice {
    pub price_per_gram: f64,
    pub timestamp: DateTime<Utc>,
    pub origin: PriceOrigin,
}

impl CachedPrice {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
    }
}

/// Single-cell price cache with a time-to-live.
///
/// The lock only guards the cell itself. Callers must not hold it across the
/// market lookup, so two requests racing on an expired entry may both refresh
/// it and the last write wins.
#[derive(Debug)]
pub struct PriceCache {
    ttl: Duration,
    cell: RwLock<Option<CachedPrice>>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            cell: RwLock::new(None),
        }
    }

    /// Cached entry, if one exists and is younger than the TTL at `now`
    pub async fn get_fresh(&self, now: DateTime<Utc>) -> Option<CachedPrice> {
        let cell = *self.cell.read().await;
        cell.filter(|entry| entry.is_fresh(now, self.ttl))
    }

    pub async fn store(&self, entry: CachedPrice) {
        *self.cell.write().await = Some(entry);
    }
}
