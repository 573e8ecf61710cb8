use async_trait::async_trait;

/// Troy ounce in grams
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// External source of the gold spot price
#[async_trait]
pub trait GoldPriceProvider: Send + Sync {
    /// Current gold price in USD per troy ounce
    async fn ounce_price(&self) -> Result<f64, MarketError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

/// Why a market-data lookup produced no usable quote
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(f64);

    #[async_trait]
    impl GoldPriceProvider for FixedProvider {
        async fn ounce_price(&self) -> Result<f64, MarketError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_provider_is_object_safe() {
        let provider: Box<dyn GoldPriceProvider> = Box::new(FixedProvider(2650.0));
        assert_eq!(provider.ounce_price().await, Ok(2650.0));
        assert_eq!(provider.name(), "fixed");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(MarketError::Status(503).to_string(), "Provider returned status 503");
        assert_eq!(
            MarketError::Malformed("missing price".into()).to_string(),
            "Malformed provider response: missing price"
        );
    }
}
