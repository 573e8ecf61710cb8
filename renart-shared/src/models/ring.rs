use serde::{Deserialize, Serialize};

/// Metal color a ring is photographed in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorVariant {
    Yellow,
    Rose,
    White,
}

impl ColorVariant {
    pub const ALL: [ColorVariant; 3] = [
        ColorVariant::Yellow,
        ColorVariant::Rose,
        ColorVariant::White,
    ];
}

/// Image URL per color variant. All three variants are always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RingImages {
    pub yellow: String,
    pub rose: String,
    pub white: String,
}

impl RingImages {
    pub fn url(&self, variant: ColorVariant) -> &str {
        match variant {
            ColorVariant::Yellow => &self.yellow,
            ColorVariant::Rose => &self.rose,
            ColorVariant::White => &self.white,
        }
    }
}

/// Static catalog entry, before any price or rating is derived
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RingRecord {
    /// Unique within the catalog
    pub name: String,

    /// In [0, 1]
    pub popularity_score: f64,

    /// Grams, always > 0
    pub weight: f64,

    pub images: RingImages,
}
