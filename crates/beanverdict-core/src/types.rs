//! Search-time value types shared by the catalog, the provider adapters, and the aggregator.
//!
//! Candidates are built fresh for every request and never persisted.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build coordinates only when both halves are present and finite.
    #[must_use]
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self { lat, lng }),
            _ => None,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km_to(&self, other: &Coordinates) -> f64 {
        crate::geo::distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Where a shop candidate came from.
///
/// Serialized with the tag of the concrete backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopSource {
    /// The local reviews database.
    #[serde(rename = "local")]
    Local,
    /// Primary commercial provider (Google Places).
    #[serde(rename = "google")]
    Primary,
    /// Budget commercial provider (Foursquare Places).
    #[serde(rename = "foursquare")]
    Budget,
    /// Free community map data (OpenStreetMap via Overpass).
    #[serde(rename = "osm")]
    CommunityMap,
}

impl ShopSource {
    /// Identifier prefix used to namespace this source's ids.
    ///
    /// Local ids are bare integers and primary-provider ids are used verbatim.
    #[must_use]
    pub fn id_prefix(self) -> Option<&'static str> {
        match self {
            ShopSource::Local | ShopSource::Primary => None,
            ShopSource::Budget => Some("fsq-"),
            ShopSource::CommunityMap => Some("osm-"),
        }
    }

    /// Resolve which external provider owns a place id.
    ///
    /// Returns `None` for bare integer ids, which belong to the local catalog.
    #[must_use]
    pub fn for_place_id(place_id: &str) -> Option<Self> {
        let id = place_id.trim();
        if id.is_empty() {
            return None;
        }
        if id.starts_with("osm-") {
            Some(ShopSource::CommunityMap)
        } else if id.starts_with("fsq-") {
            Some(ShopSource::Budget)
        } else if id.chars().all(|c| c.is_ascii_digit()) {
            None
        } else {
            Some(ShopSource::Primary)
        }
    }

    /// Build a namespaced id from a provider's native id.
    #[must_use]
    pub fn namespaced_id(self, native_id: &str) -> String {
        match self.id_prefix() {
            Some(prefix) => format!("{prefix}{native_id}"),
            None => native_id.to_string(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShopSource::Local => "local",
            ShopSource::Primary => "google",
            ShopSource::Budget => "foursquare",
            ShopSource::CommunityMap => "osm",
        }
    }
}

impl std::fmt::Display for ShopSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prospective coffee shop result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopCandidate {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// 0–5, one decimal place. Always `None` for local shops with no reviews.
    pub avg_rating: Option<f64>,
    pub review_count: i64,
    pub distance_km: Option<f64>,
    pub distance_miles: Option<f64>,
    pub source: ShopSource,
}

impl ShopCandidate {
    /// Fill in `distance_km`/`distance_miles` from `origin` when the shop has coordinates.
    pub fn annotate_distance(&mut self, origin: Option<&Coordinates>) {
        if let (Some(origin), Some(coords)) = (origin, self.coordinates.as_ref()) {
            let km = crate::geo::round_one_decimal(origin.distance_km_to(coords));
            self.distance_km = Some(km);
            self.distance_miles = crate::geo::km_to_miles(Some(km));
        }
    }
}

/// One prospective drink result. Drinks only ever come from the local catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkCandidate {
    pub id: i64,
    /// Normalised lowercase key, e.g. `"oat milk latte"`.
    pub drink_type: String,
    pub display_name: String,
    pub shop_id: i64,
    pub shop_name: String,
    pub shop_address: Option<String>,
    #[serde(skip_serializing)]
    pub shop_coordinates: Option<Coordinates>,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
    /// Distance from the caller to the owning shop.
    pub distance_km: Option<f64>,
    pub distance_miles: Option<f64>,
}

impl DrinkCandidate {
    pub fn annotate_distance(&mut self, origin: Option<&Coordinates>) {
        if let (Some(origin), Some(coords)) = (origin, self.shop_coordinates.as_ref()) {
            let km = crate::geo::round_one_decimal(origin.distance_km_to(coords));
            self.distance_km = Some(km);
            self.distance_miles = crate::geo::km_to_miles(Some(km));
        }
    }
}

/// The response envelope of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub shops: Vec<ShopCandidate>,
    pub drinks: Vec<DrinkCandidate>,
    pub suggestions: Vec<String>,
}

impl SearchResult {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shops.is_empty() && self.drinks.is_empty() && self.suggestions.is_empty()
    }
}

/// A review fetched from an external provider for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReview {
    pub author: String,
    pub rating: Option<f64>,
    pub text: String,
    pub time: Option<String>,
}

/// Rich data for a single external place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
    pub photos: Vec<String>,
    pub reviews: Vec<ExternalReview>,
    /// `"$"` through `"$$$$"`.
    pub price_level: Option<String>,
    pub opening_hours: Vec<String>,
    pub website: Option<String>,
    pub source: ShopSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop(coords: Option<Coordinates>) -> ShopCandidate {
        ShopCandidate {
            id: "1".to_string(),
            name: "Merit Coffee".to_string(),
            address: None,
            city: None,
            coordinates: coords,
            avg_rating: None,
            review_count: 0,
            distance_km: None,
            distance_miles: None,
            source: ShopSource::Local,
        }
    }

    #[test]
    fn place_id_prefixes_route_to_providers() {
        assert_eq!(
            ShopSource::for_place_id("osm-123"),
            Some(ShopSource::CommunityMap)
        );
        assert_eq!(ShopSource::for_place_id("fsq-abc"), Some(ShopSource::Budget));
        assert_eq!(
            ShopSource::for_place_id("ChIJN1t_tDeuEmsRUsoyG83frY4"),
            Some(ShopSource::Primary)
        );
        assert_eq!(ShopSource::for_place_id("42"), None);
        assert_eq!(ShopSource::for_place_id("  "), None);
    }

    #[test]
    fn namespaced_ids_are_disjoint() {
        assert_eq!(ShopSource::Budget.namespaced_id("abc"), "fsq-abc");
        assert_eq!(ShopSource::CommunityMap.namespaced_id("99"), "osm-99");
        assert_eq!(ShopSource::Primary.namespaced_id("ChIJ"), "ChIJ");
    }

    #[test]
    fn source_serializes_to_backing_service_tag() {
        let json = serde_json::to_string(&ShopSource::Budget).unwrap();
        assert_eq!(json, "\"foursquare\"");
        let json = serde_json::to_string(&ShopSource::CommunityMap).unwrap();
        assert_eq!(json, "\"osm\"");
    }

    #[test]
    fn annotate_distance_requires_both_coordinates() {
        let mut no_origin = shop(Some(Coordinates::new(30.25, -97.76)));
        no_origin.annotate_distance(None);
        assert!(no_origin.distance_km.is_none());

        let mut no_coords = shop(None);
        no_coords.annotate_distance(Some(&Coordinates::new(30.27, -97.74)));
        assert!(no_coords.distance_km.is_none());

        let mut both = shop(Some(Coordinates::new(30.27, -97.74)));
        both.annotate_distance(Some(&Coordinates::new(30.27, -97.74)));
        assert_eq!(both.distance_km, Some(0.0));
        assert_eq!(both.distance_miles, Some(0.0));
    }

    #[test]
    fn coordinates_from_parts_rejects_partial_or_nan() {
        assert!(Coordinates::from_parts(Some(1.0), None).is_none());
        assert!(Coordinates::from_parts(Some(f64::NAN), Some(1.0)).is_none());
        assert_eq!(
            Coordinates::from_parts(Some(1.0), Some(2.0)),
            Some(Coordinates::new(1.0, 2.0))
        );
    }

    #[test]
    fn shop_candidate_serializes_camel_case() {
        let json = serde_json::to_value(shop(None)).unwrap();
        assert!(json.get("reviewCount").is_some());
        assert!(json.get("avgRating").is_some());
        assert_eq!(json["source"], "local");
    }
}
