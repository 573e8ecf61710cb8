use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use renart_core::Clock;
use renart_shared::RingRecord;

use crate::gold::{GoldPrice, GoldPriceService, PriceSource};
use crate::product::{PricedProduct, ProductFilters, SortOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatalogQuery {
    pub filters: ProductFilters,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub products: Vec<PricedProduct>,
    pub price_per_gram: f64,
    /// Always `products.len()`
    pub total_count: usize,
    pub price_source: PriceSource,
}

impl CatalogResponse {
    fn new(products: Vec<PricedProduct>, gold: &GoldPrice) -> Self {
        Self {
            total_count: products.len(),
            products,
            price_per_gram: gold.per_gram(),
            price_source: gold.source(),
        }
    }
}

/// Builds priced listings from the static ring catalog.
///
/// Products are re-derived on every call from the rings and the current
/// price-per-gram; the only state carried between calls is the gold price
/// cache inside [`GoldPriceService`].
pub struct CatalogService {
    rings: Arc<[RingRecord]>,
    gold: GoldPriceService,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(rings: Vec<RingRecord>, gold: GoldPriceService, clock: Arc<dyn Clock>) -> Self {
        Self {
            rings: rings.into(),
            gold,
            clock,
        }
    }

    /// Filtered listing, most popular first. Never fails; see
    /// [`ProductFilters`] for how unusual bounds behave.
    pub async fn build_catalog(&self, filters: &ProductFilters) -> CatalogResponse {
        self.query(&CatalogQuery {
            filters: *filters,
            sort: SortOrder::Featured,
        })
        .await
    }

    pub async fn query(&self, query: &CatalogQuery) -> CatalogResponse {
        let gold = self.gold.price_per_gram().await;

        let mut products: Vec<PricedProduct> = self
            .price_all(gold.per_gram())
            .into_iter()
            .filter(|p| query.filters.matches(p))
            .collect();
        query.sort.apply(&mut products);

        debug!(
            matched = products.len(),
            of = self.rings.len(),
            sort = ?query.sort,
            "Built catalog listing"
        );

        CatalogResponse::new(products, &gold)
    }

    /// The `limit` most popular products, unfiltered
    pub async fn featured(&self, limit: usize) -> CatalogResponse {
        let mut listing = self.build_catalog(&ProductFilters::default()).await;
        listing.products.truncate(limit);
        listing.total_count = listing.products.len();
        listing
    }

    pub async fn product(&self, id: &str) -> Option<PricedProduct> {
        let gold = self.gold.price_per_gram().await;
        self.price_all(gold.per_gram()).into_iter().find(|p| p.id == id)
    }

    pub async fn gold_price(&self) -> GoldPrice {
        self.gold.price_per_gram().await
    }

    fn price_all(&self, price_per_gram: f64) -> Vec<PricedProduct> {
        let now = self.clock.now();
        self.rings
            .iter()
            .enumerate()
            .map(|(position, ring)| PricedProduct::derive(position, ring, price_per_gram, now))
            .collect()
    }
}
