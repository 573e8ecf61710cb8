use chrono::{DateTime, Utc};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use renart_shared::RingRecord;

use crate::pricing::{calculate_price, convert_to_rating};

/// A ring with its price and rating derived for the current price-per-gram
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    pub id: String,
    #[serde(flatten)]
    pub ring: RingRecord,
    pub price: f64,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricedProduct {
    /// `position` is the ring's zero-based index in the catalog
    pub fn derive(
        position: usize,
        ring: &RingRecord,
        price_per_gram: f64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: product_id(position),
            ring: ring.clone(),
            price: calculate_price(ring.popularity_score, ring.weight, price_per_gram),
            rating: convert_to_rating(ring.popularity_score),
            created_at: at,
            updated_at: at,
        }
    }
}

pub fn product_id(position: usize) -> String {
    format!("product-{}", position + 1)
}

/// Listing filters, applied conjunctively.
///
/// Bounds are deliberately not validated: a negative or inverted range is
/// accepted and simply yields an empty or unfiltered listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// On the 0-5 rating scale
    pub min_rating: Option<f64>,
}

impl ProductFilters {
    pub fn matches(&self, product: &PricedProduct) -> bool {
        self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
            && self.min_rating.map_or(true, |min| product.rating >= min)
    }
}

/// Listing order. Every order is stable, so ties keep catalog order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Most popular first
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortOrder {
    pub fn apply(self, products: &mut [PricedProduct]) {
        match self {
            SortOrder::Featured => products
                .sort_by(|a, b| b.ring.popularity_score.total_cmp(&a.ring.popularity_score)),
            SortOrder::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

/// Parses the kebab-case names used on the wire, e.g. `price-asc`
impl FromStr for SortOrder {
    type Err = serde::de::value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}
