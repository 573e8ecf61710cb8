use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use renart_catalog::PricingConfig;
use renart_shared::Masked;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub market: MarketConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Gold spot-price feed
#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// When false the catalog prices off `pricing.fallback_price_per_gram` only
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub endpoint: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    pub access_key: Masked<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_enabled() -> bool { true }
fn default_symbol() -> String { "XAUUSD".into() }
fn default_timeout() -> u64 { 5 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Ring records file; the bundled catalog is used when unset
    pub data_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::from(dir.join("default").as_path()))
            // Per-environment overrides, optional
            .add_source(config::File::from(dir.join(&run_mode).as_path()).required(false))
            // Local overrides, never checked in
            .add_source(config::File::from(dir.join("local").as_path()).required(false))
            // e.g. `RENART_MARKET__ACCESS_KEY=...`
            .add_source(
                config::Environment::with_prefix("RENART")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }
}
