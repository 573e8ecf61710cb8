use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use renart_shared::{ColorVariant, RingRecord};

use crate::StoreError;

const BUNDLED_RINGS: &str = include_str!("../../data/rings.json");

/// Ring records shipped with the service
pub fn bundled_rings() -> Result<Vec<RingRecord>, StoreError> {
    parse_rings(BUNDLED_RINGS)
}

/// Reads `path` if given, the bundled records otherwise. Records are only
/// read once at start-up; a changed file needs a restart.
pub fn load_rings(path: Option<&Path>) -> Result<Vec<RingRecord>, StoreError> {
    let rings = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_rings(&json)?
        }
        None => bundled_rings()?,
    };

    info!(
        count = rings.len(),
        source = %path.map_or_else(|| "bundled".to_string(), |p| p.display().to_string()),
        "Loaded ring catalog"
    );
    Ok(rings)
}

pub fn parse_rings(json: &str) -> Result<Vec<RingRecord>, StoreError> {
    let rings: Vec<RingRecord> = serde_json::from_str(json)?;
    validate_rings(&rings)?;
    Ok(rings)
}

pub fn validate_rings(rings: &[RingRecord]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();

    for ring in rings {
        let invalid = |reason: &str| StoreError::InvalidRing {
            name: ring.name.clone(),
            reason: reason.to_string(),
        };

        if ring.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !seen.insert(ring.name.as_str()) {
            return Err(StoreError::DuplicateRing(ring.name.clone()));
        }
        if !(0.0..=1.0).contains(&ring.popularity_score) {
            return Err(invalid("popularityScore must be within [0, 1]"));
        }
        if !ring.weight.is_finite() || ring.weight <= 0.0 {
            return Err(invalid("weight must be a positive number of grams"));
        }
        if ColorVariant::ALL.iter().any(|c| ring.images.url(*c).trim().is_empty()) {
            return Err(invalid("every color variant needs an image"));
        }
    }

    Ok(())
}
