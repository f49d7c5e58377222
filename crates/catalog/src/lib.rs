use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use waratah_core::Place;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed reading catalog file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not a valid JSON place list")]
    Parse(#[from] serde_json::Error),
    #[error("invalid place at index {index} ({name:?}): {reason}")]
    InvalidPlace {
        index: usize,
        name: String,
        reason: &'static str,
    },
}

/// Immutable place catalog, loaded once at process start. Order is the file
/// order and is load-bearing: ranking and proximity ties both fall back to
/// it.
#[derive(Debug, Clone)]
pub struct Catalog {
    places: Vec<Place>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        // Some exporters write a UTF-8 BOM; tolerate it.
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let places: Vec<Place> = serde_json::from_str(raw)?;

        for (index, place) in places.iter().enumerate() {
            validate(index, place)?;
        }

        Ok(Self { places })
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Place counts per lower-cased city, in city order.
    pub fn city_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for place in &self.places {
            *counts.entry(place.city.to_lowercase()).or_insert(0) += 1;
        }
        counts
    }
}

fn validate(index: usize, place: &Place) -> Result<(), CatalogError> {
    let invalid = |reason| CatalogError::InvalidPlace {
        index,
        name: place.name.clone(),
        reason,
    };

    if place.name.trim().is_empty() {
        return Err(invalid("empty name"));
    }
    if place.kind.trim().is_empty() {
        return Err(invalid("empty type"));
    }
    if place.city.trim().is_empty() {
        return Err(invalid("empty city"));
    }
    if !(-90.0..=90.0).contains(&place.lat) {
        return Err(invalid("latitude out of range"));
    }
    if !(-180.0..=180.0).contains(&place.lng) {
        return Err(invalid("longitude out of range"));
    }

    Ok(())
}
