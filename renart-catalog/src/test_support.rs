use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use renart_core::{GoldPriceProvider, MarketError};
use renart_shared::{RingImages, RingRecord};

/// Provider returning a scripted quote and counting lookups
pub struct ScriptedProvider {
    quote: Mutex<Result<f64, MarketError>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn returning(quote: Result<f64, MarketError>) -> Self {
        Self {
            quote: Mutex::new(quote),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, quote: Result<f64, MarketError>) {
        *self.quote.lock().unwrap() = quote;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GoldPriceProvider for ScriptedProvider {
    async fn ounce_price(&self) -> Result<f64, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Suspend like a network call would
        tokio::task::yield_now().await;
        self.quote.lock().unwrap().clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn ring(name: &str, popularity_score: f64, weight: f64) -> RingRecord {
    let slug = name.to_lowercase().replace(' ', "-");
    RingRecord {
        name: name.to_string(),
        popularity_score,
        weight,
        images: RingImages {
            yellow: format!("https://cdn.example.com/{}-y.jpg", slug),
            rose: format!("https://cdn.example.com/{}-r.jpg", slug),
            white: format!("https://cdn.example.com/{}-w.jpg", slug),
        },
    }
}

/// The eight storefront rings
pub fn storefront_rings() -> Vec<RingRecord> {
    vec![
        ring("Engagement Ring 1", 0.85, 2.1),
        ring("Engagement Ring 2", 0.51, 3.4),
        ring("Engagement Ring 3", 0.92, 3.8),
        ring("Engagement Ring 4", 0.88, 4.5),
        ring("Engagement Ring 5", 0.80, 2.5),
        ring("Engagement Ring 6", 0.82, 1.8),
        ring("Engagement Ring 7", 0.70, 5.2),
        ring("Engagement Ring 8", 0.90, 3.7),
    ]
}
