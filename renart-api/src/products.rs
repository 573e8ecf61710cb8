use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use renart_catalog::{
    CatalogQuery, CatalogResponse, PriceOrigin, PriceSource, PricedProduct, ProductFilters,
    SortOrder,
};

use crate::{error::AppError, state::AppState};

const DEFAULT_FEATURED_LIMIT: usize = 8;
const MAX_FEATURED_LIMIT: usize = 50;

/// Query string of `GET /v1/products`. Bounds are passed through to the
/// catalog unchecked, and a field sent empty (`minPrice=`) counts as unset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_rating: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort: Option<SortOrder>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl From<ListProductsQuery> for CatalogQuery {
    fn from(q: ListProductsQuery) -> Self {
        CatalogQuery {
            filters: ProductFilters {
                min_price: q.min_price,
                max_price: q.max_price,
                min_rating: q.min_rating,
            },
            sort: q.sort.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldPriceResponse {
    pub price_per_gram: f64,
    pub source: PriceSource,
    /// Whether the value is a live quote or the fallback constant, also
    /// for cache hits
    pub origin: PriceOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products))
        .route("/v1/products/featured", get(featured_products))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/gold-price", get(gold_price))
}

/// GET /v1/products
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<CatalogResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let query = CatalogQuery::from(query);
    Ok(Json(state.catalog.query(&query).await))
}

/// GET /v1/products/featured
async fn featured_products(
    State(state): State<AppState>,
    query: Result<Query<FeaturedQuery>, QueryRejection>,
) -> Result<Json<CatalogResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT);

    if !(1..=MAX_FEATURED_LIMIT).contains(&limit) {
        return Err(AppError::ValidationError(format!(
            "limit must be between 1 and {}",
            MAX_FEATURED_LIMIT
        )));
    }

    Ok(Json(state.catalog.featured(limit).await))
}

/// GET /v1/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PricedProduct>, AppError> {
    state
        .catalog
        .product(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found: {}", id)))
}

/// GET /v1/gold-price
async fn gold_price(State(state): State<AppState>) -> Json<GoldPriceResponse> {
    let gold = state.catalog.gold_price().await;

    Json(GoldPriceResponse {
        price_per_gram: gold.per_gram(),
        source: gold.source(),
        origin: gold.origin(),
        fallback_reason: gold.fallback_reason().map(ToString::to_string),
    })
}
