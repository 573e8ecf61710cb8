pub mod catalog;
pub mod gold;
pub mod price_cache;
pub mod pricing;
pub mod product;

#[cfg(test)]
mod test_support;

pub use catalog::{CatalogQuery, CatalogResponse, CatalogService};
pub use gold::{FallbackReason, GoldPrice, GoldPriceService, PriceSource};
pub use price_cache::{CachedPrice, PriceCache, PriceOrigin};
pub use pricing::PricingConfig;
pub use product::{PricedProduct, ProductFilters, SortOrder};
