use serde::{Deserialize, Serialize};

/// One catalog entry. Loaded once at startup and never mutated; `kind` is an
/// open label (cafe, restaurant, attraction, ...) matched by equality, `city`
/// is compared case-insensitively everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub area: String,
    pub city: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Projection returned by proximity search. Never hands out the raw catalog
/// record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub area: String,
    pub city: String,
    pub distance_km: f64,
}
