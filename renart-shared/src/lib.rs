pub mod masked;
pub mod models;

pub use masked::Masked;
pub use models::ring::{ColorVariant, RingImages, RingRecord};
