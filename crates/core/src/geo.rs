use crate::models::{NearbyPlace, Place};

const EARTH_RADIUS_KM: f64 = 6371.0;

const MIN_LIMIT: i64 = 1;
const MAX_LIMIT: i64 = 10;

/// Great-circle distance between two degree coordinates on a sphere of
/// Earth's mean radius.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Filter the catalog by optional city and kind, compute rounded distances
/// from the query point, and return the nearest entries. `kind == "any"`
/// disables the kind filter; `limit` is clamped to [1, 10]. Ties at the same
/// rounded distance keep catalog order.
pub fn nearest(
    places: &[Place],
    lat: f64,
    lng: f64,
    kind: &str,
    city: Option<&str>,
    limit: i64,
) -> Vec<NearbyPlace> {
    let city = city.map(str::to_lowercase);

    let mut results: Vec<NearbyPlace> = places
        .iter()
        .filter(|place| match city.as_deref() {
            Some(city) => place.city.to_lowercase() == city,
            None => true,
        })
        .filter(|place| kind == "any" || place.kind == kind)
        .map(|place| NearbyPlace {
            name: place.name.clone(),
            kind: place.kind.clone(),
            area: place.area.clone(),
            city: place.city.clone(),
            distance_km: round2(haversine_km(lat, lng, place.lat, place.lng)),
        })
        .collect();

    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results.truncate(limit.clamp(MIN_LIMIT, MAX_LIMIT) as usize);
    results
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
