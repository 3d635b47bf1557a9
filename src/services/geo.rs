//! Great-circle distance between two points on Earth.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers. Out-of-range inputs are not rejected;
/// NaN inputs yield NaN, which never passes a `<= radius` check.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p = std::f64::consts::PI / 180.0;
    let a = 0.5 - ((lat2 - lat1) * p).cos() / 2.0
        + (lat1 * p).cos() * (lat2 * p).cos() * (1.0 - ((lon2 - lon1) * p).cos()) / 2.0;

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn within_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, max_radius_km: f64) -> bool {
    distance_km(lat1, lon1, lat2, lon2) <= max_radius_km
}
