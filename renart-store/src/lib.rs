pub mod app_config;
pub mod gold_feed;
pub mod ring_source;

pub use gold_feed::HttpGoldFeed;
pub use ring_source::load_rings;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ring data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid ring {name:?}: {reason}")]
    InvalidRing { name: String, reason: String },

    #[error("Duplicate ring name: {0}")]
    DuplicateRing(String),
}
