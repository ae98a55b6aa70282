//! External coffee shop sources and the location services used to anchor them.
//!
//! Each HTTP client returns typed [`PlacesError`]s; [`PlaceProvider`] is the
//! degrade-to-empty boundary the search aggregator consumes.

pub mod error;
pub mod foursquare;
pub mod geocode;
pub mod google;
mod http;
pub mod ip_locate;
mod normalize;
pub mod overpass;
pub mod provider;

pub use error::PlacesError;
pub use foursquare::FoursquareClient;
pub use geocode::NominatimGeocoder;
pub use google::GooglePlacesClient;
pub use ip_locate::{is_public_ip, IpLocator};
pub use overpass::OverpassClient;
pub use provider::{build_providers, PlaceId, PlaceProvider};
