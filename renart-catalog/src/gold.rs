use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use renart_core::{Clock, GoldPriceProvider, MarketError};

use crate::price_cache::{CachedPrice, PriceCache, PriceOrigin};
use crate::pricing::{ounce_to_gram, PricingConfig};

/// Why the fallback price-per-gram was used instead of a live quote
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FallbackReason {
    #[error("market feed disabled")]
    Disabled,

    #[error("{0}")]
    Provider(#[from] MarketError),

    #[error("quote of {ounce_price} USD/oz outside accepted band")]
    OutOfBand { ounce_price: f64 },
}

/// Outcome of resolving the gold price-per-gram
#[derive(Debug, Clone, PartialEq)]
pub enum GoldPrice {
    /// Served from a fresh cache entry, no lookup made
    Cached { price_per_gram: f64, origin: PriceOrigin },

    /// Validated live quote
    Fetched(f64),

    FallbackUsed { price_per_gram: f64, reason: FallbackReason },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Cache,
    Live,
    Fallback,
}

impl GoldPrice {
    pub fn per_gram(&self) -> f64 {
        match self {
            GoldPrice::Cached { price_per_gram, .. } => *price_per_gram,
            GoldPrice::Fetched(price_per_gram) => *price_per_gram,
            GoldPrice::FallbackUsed { price_per_gram, .. } => *price_per_gram,
        }
    }

    pub fn source(&self) -> PriceSource {
        match self {
            GoldPrice::Cached { .. } => PriceSource::Cache,
            GoldPrice::Fetched(_) => PriceSource::Live,
            GoldPrice::FallbackUsed { .. } => PriceSource::Fallback,
        }
    }

    /// Live or fallback, looking through cache hits
    pub fn origin(&self) -> PriceOrigin {
        match self {
            GoldPrice::Cached { origin, .. } => *origin,
            GoldPrice::Fetched(_) => PriceOrigin::Live,
            GoldPrice::FallbackUsed { .. } => PriceOrigin::Fallback,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            GoldPrice::FallbackUsed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Resolves the price-per-gram through the cache, the market feed, and
/// finally the configured constant.
pub struct GoldPriceService {
    provider: Option<Arc<dyn GoldPriceProvider>>,
    cache: PriceCache,
    clock: Arc<dyn Clock>,
    config: PricingConfig,
}

impl GoldPriceService {
    /// `provider: None` runs on the fallback constant alone
    pub fn new(
        provider: Option<Arc<dyn GoldPriceProvider>>,
        clock: Arc<dyn Clock>,
        config: PricingConfig,
    ) -> Self {
        Self {
            provider,
            cache: PriceCache::new(config.cache_ttl()),
            clock,
            config,
        }
    }

    /// Never fails: lookup errors and implausible quotes resolve to the
    /// fallback constant, and whatever is produced is cached for the TTL.
    pub async fn price_per_gram(&self) -> GoldPrice {
        if let Some(entry) = self.cache.get_fresh(self.clock.now()).await {
            debug!(
                price_per_gram = entry.price_per_gram,
                origin = ?entry.origin,
                "Using cached gold price"
            );
            return GoldPrice::Cached {
                price_per_gram: entry.price_per_gram,
                origin: entry.origin,
            };
        }

        let resolved = self.resolve().await;

        self.cache
            .store(CachedPrice {
                price_per_gram: resolved.per_gram(),
                timestamp: self.clock.now(),
                origin: resolved.origin(),
            })
            .await;

        resolved
    }

    async fn resolve(&self) -> GoldPrice {
        let Some(provider) = &self.provider else {
            return self.fallback(FallbackReason::Disabled);
        };

        debug!(provider = provider.name(), "Fetching gold price");

        match provider.ounce_price().await {
            Ok(ounce_price) if self.config.accepts_ounce_price(ounce_price) => {
                let per_gram = ounce_to_gram(ounce_price);
                info!(
                    provider = provider.name(),
                    ounce_price,
                    price_per_gram = per_gram,
                    "Fetched gold price"
                );
                GoldPrice::Fetched(per_gram)
            }
            Ok(ounce_price) => self.fallback(FallbackReason::OutOfBand { ounce_price }),
            Err(e) => self.fallback(e.into()),
        }
    }

    fn fallback(&self, reason: FallbackReason) -> GoldPrice {
        warn!(
            %reason,
            price_per_gram = self.config.fallback_price_per_gram,
            "Using fallback gold price"
        );
        GoldPrice::FallbackUsed {
            price_per_gram: self.config.fallback_price_per_gram,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{start_time, ScriptedProvider};
    use chrono::Duration;
    use renart_core::ManualClock;

    fn service(provider: Arc<ScriptedProvider>, clock: Arc<ManualClock>) -> GoldPriceService {
        GoldPriceService::new(Some(provider), clock, PricingConfig::default())
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let provider = Arc::new(ScriptedProvider::returning(Ok(2650.0)));
        let clock = Arc::new(ManualClock::new(start_time()));
        let gold = service(provider.clone(), clock.clone());

        let first = gold.price_per_gram().await;
        assert_eq!(first.source(), PriceSource::Live);

        clock.advance(Duration::minutes(59));
        let second = gold.price_per_gram().await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(second.source(), PriceSource::Cache);
        assert_eq!(second.per_gram(), first.per_gram());
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_fresh_lookup() {
        let provider = Arc::new(ScriptedProvider::returning(Ok(2650.0)));
        let clock = Arc::new(ManualClock::new(start_time()));
        let gold = service(provider.clone(), clock.clone());

        gold.price_per_gram().await;
        provider.set(Ok(3110.35));
        clock.advance(Duration::hours(1));

        let refreshed = gold.price_per_gram().await;
        assert_eq!(provider.calls(), 2);
        assert_eq!(refreshed, GoldPrice::Fetched(3110.35 / 31.1035));
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let provider = Arc::new(ScriptedProvider::returning(Err(MarketError::Timeout)));
        let clock = Arc::new(ManualClock::new(start_time()));
        let gold = service(provider, clock);

        let price = gold.price_per_gram().await;
        assert_eq!(
            price,
            GoldPrice::FallbackUsed {
                price_per_gram: 85.2,
                reason: FallbackReason::Provider(MarketError::Timeout),
            }
        );
        assert!(price.per_gram().is_finite() && price.per_gram() > 0.0);
    }

    #[tokio::test]
    async fn test_out_of_band_quote_falls_back_and_is_cached() {
        let provider = Arc::new(ScriptedProvider::returning(Ok(26.5)));
        let clock = Arc::new(ManualClock::new(start_time()));
        let gold = service(provider.clone(), clock.clone());

        let price = gold.price_per_gram().await;
        assert_eq!(price.per_gram(), 85.2);
        assert_eq!(price.origin(), PriceOrigin::Fallback);
        assert_eq!(
            price.fallback_reason(),
            Some(&FallbackReason::OutOfBand { ounce_price: 26.5 })
        );

        clock.advance(Duration::minutes(10));
        let again = gold.price_per_gram().await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(
            again,
            GoldPrice::Cached {
                price_per_gram: 85.2,
                origin: PriceOrigin::Fallback,
            }
        );
    }

    #[tokio::test]
    async fn test_racing_refreshes_both_succeed() {
        let provider = Arc::new(ScriptedProvider::returning(Ok(2650.0)));
        let clock = Arc::new(ManualClock::new(start_time()));
        let gold = service(provider.clone(), clock);

        let (a, b) = tokio::join!(gold.price_per_gram(), gold.price_per_gram());

        // Both missed the empty cache and looked the price up
        assert_eq!(provider.calls(), 2);
        assert_eq!(a, GoldPrice::Fetched(2650.0 / 31.1035));
        assert_eq!(a, b);

        let cached = gold.price_per_gram().await;
        assert_eq!(provider.calls(), 2);
        assert_eq!(
            cached,
            GoldPrice::Cached {
                price_per_gram: a.per_gram(),
                origin: PriceOrigin::Live,
            }
        );
    }

    #[tokio::test]
    async fn test_fallback_is_cached_too() {
        let provider = Arc::new(ScriptedProvider::returning(Err(MarketError::Status(502))));
        let clock = Arc::new(ManualClock::new(start_time()));
        let gold = service(provider.clone(), clock.clone());

        gold.price_per_gram().await;
        provider.set(Ok(2650.0));
        clock.advance(Duration::minutes(30));

        let price = gold.price_per_gram().await;
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            price,
            GoldPrice::Cached {
                price_per_gram: 85.2,
                origin: PriceOrigin::Fallback,
            }
        );
    }

    #[tokio::test]
    async fn test_disabled_feed_uses_constant() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let config = PricingConfig {
            fallback_price_per_gram: 70.0,
            ..PricingConfig::default()
        };
        let gold = GoldPriceService::new(None, clock, config);

        let price = gold.price_per_gram().await;
        assert_eq!(price.per_gram(), 70.0);
        assert_eq!(price.fallback_reason(), Some(&FallbackReason::Disabled));
    }
}
