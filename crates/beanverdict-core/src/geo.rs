//! Great-circle distance and unit helpers.

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_TO_MILES: f64 = 0.621_371;

/// Haversine distance in kilometres between two lat/lng pairs.
#[must_use]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Convert kilometres to miles, rounded to one decimal place.
#[must_use]
pub fn km_to_miles(km: Option<f64>) -> Option<f64> {
    km.map(|km| round_one_decimal(km * KM_TO_MILES))
}

/// Round to one decimal place. All distances and ratings surfaced to callers go through this.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
