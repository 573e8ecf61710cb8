use chrono::Duration;
use serde::{Deserialize, Serialize};

use renart_core::market::GRAMS_PER_TROY_OUNCE;

/// Gold pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Used whenever no validated live quote is available (~$2650/oz)
    pub fallback_price_per_gram: f64,

    /// How long a resolved price-per-gram stays valid
    pub cache_ttl_seconds: u64,

    /// Lowest per-ounce quote accepted from the market feed
    pub min_ounce_price: f64,

    /// Highest per-ounce quote accepted from the market feed
    pub max_ounce_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fallback_price_per_gram: 85.2,
            cache_ttl_seconds: 60 * 60,
            min_ounce_price: 2000.0,
            max_ounce_price: 4000.0,
        }
    }
}

impl PricingConfig {
    pub fn cache_ttl(&self) -> Duration {
        i64::try_from(self.cache_ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    /// Sanity band for a per-ounce quote, bounds inclusive
    pub fn accepts_ounce_price(&self, ounce_price: f64) -> bool {
        ounce_price.is_finite()
            && ounce_price >= self.min_ounce_price
            && ounce_price <= self.max_ounce_price
    }
}

/// Product price: `(popularity + 1) × weight × price-per-gram`
pub fn calculate_price(popularity_score: f64, weight: f64, price_per_gram: f64) -> f64 {
    (popularity_score + 1.0) * weight * price_per_gram
}

/// Five-star rating rounded half-up to one decimal
pub fn convert_to_rating(popularity_score: f64) -> f64 {
    ((popularity_score * 5.0) * 10.0).round() / 10.0
}

pub fn ounce_to_gram(price_per_ounce: f64) -> f64 {
    price_per_ounce / GRAMS_PER_TROY_OUNCE
}
