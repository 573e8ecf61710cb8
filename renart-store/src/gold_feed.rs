//! HTTP client for the gold spot-price feed.
//!
//! Speaks the FCS API `forex/latest` shape:
//! `{"status": true, "response": [{"price": "2650.10", "c": "2650.10", ...}]}`.
//! Anything else is reported as a [`MarketError`], never a panic.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use renart_core::{GoldPriceProvider, MarketError};
use renart_shared::Masked;

use crate::app_config::MarketConfig;

#[derive(Debug, Clone)]
pub struct HttpGoldFeed {
    client: reqwest::Client,
    endpoint: String,
    symbol: String,
    access_key: Masked<String>,
}

impl HttpGoldFeed {
    pub fn new(config: &MarketConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("renart-catalog/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            symbol: config.symbol.clone(),
            access_key: config.access_key.clone(),
        })
    }
}

#[async_trait]
impl GoldPriceProvider for HttpGoldFeed {
    async fn ounce_price(&self) -> Result<f64, MarketError> {
        debug!(endpoint = %self.endpoint, symbol = %self.symbol, "Requesting gold quote");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("symbol", self.symbol.as_str()),
                ("access_key", self.access_key.expose().as_str()),
            ])
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MarketError::Status(status.as_u16()));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| MarketError::Malformed(e.without_url().to_string()))?;

        parse_ounce_price(&body)
    }

    fn name(&self) -> &str {
        "fcsapi"
    }
}

// The query string carries the access key, so reqwest errors lose their URL
// before they reach a log line.
fn request_error(e: reqwest::Error) -> MarketError {
    if e.is_timeout() {
        MarketError::Timeout
    } else {
        MarketError::Http(e.without_url().to_string())
    }
}

/// Pulls the per-ounce price out of a feed response. `price` wins over `c`;
/// either may be a JSON number or a numeric string.
pub fn parse_ounce_price(body: &Value) -> Result<f64, MarketError> {
    if body.get("status").and_then(Value::as_bool) == Some(false) {
        let msg = body
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("provider reported failure");
        return Err(MarketError::Malformed(msg.to_string()));
    }

    let quote = body
        .get("response")
        .and_then(Value::as_array)
        .and_then(|quotes| quotes.first())
        .ok_or_else(|| MarketError::Malformed("no quote in response".into()))?;

    let raw = quote
        .get("price")
        .filter(|v| !v.is_null())
        .or_else(|| quote.get("c"))
        .ok_or_else(|| MarketError::Malformed("quote has no price".into()))?;

    let price = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite() && *p > 0.0)
    .ok_or_else(|| MarketError::Malformed(format!("unusable price {}", raw)))?;

    Ok(price)
}
