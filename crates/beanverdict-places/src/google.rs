//! Client for the Google Places web service (the primary commercial provider).
//!
//! Search uses the legacy `textsearch` endpoint biased to cafés around an
//! origin; detail fetches use `details`. Both surface API-level failures
//! (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...) as [`PlacesError::ProviderStatus`].

use std::time::Duration;

use beanverdict_core::{Coordinates, ExternalReview, PlaceDetail, ShopCandidate, ShopSource};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{build_client, join, parse_base_url, read_json};
use crate::normalize::{non_blank, price_symbols, round_rating};

const PROVIDER: &str = "google";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
const MAX_SEARCH_RESULTS: usize = 20;
const MAX_PHOTOS: usize = 12;
const MAX_REVIEWS: usize = 5;
const DETAIL_FIELDS: &str = "name,formatted_address,geometry,rating,user_ratings_total,photos,\
                             opening_hours,price_level,reviews,website";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<GooglePlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GooglePlace {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    user_ratings_total: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<GoogleDetail>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleDetail {
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    user_ratings_total: Option<i64>,
    #[serde(default)]
    photos: Vec<GooglePhoto>,
    opening_hours: Option<OpeningHours>,
    price_level: Option<i64>,
    #[serde(default)]
    reviews: Vec<GoogleReview>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GooglePhoto {
    photo_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleReview {
    author_name: Option<String>,
    rating: Option<f64>,
    text: Option<String>,
    relative_time_description: Option<String>,
}

fn coordinates(geometry: Option<&Geometry>) -> Option<Coordinates> {
    geometry
        .and_then(|g| g.location.as_ref())
        .and_then(|l| Coordinates::from_parts(Some(l.lat), Some(l.lng)))
}

/// Client for Google Places text search and place details.
pub struct GooglePlacesClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    radius_m: u32,
    timeout: Duration,
}

impl GooglePlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// A `None` key is accepted; every call then fails with
    /// [`PlacesError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout: Duration,
        radius_km: f64,
        user_agent: &str,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout, radius_km, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the client cannot be built, or
    /// [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout: Duration,
        radius_km: f64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            api_key: api_key.map(str::to_owned),
            base_url: parse_base_url(base_url)?,
            radius_m: radius_metres(radius_km),
            timeout,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn api_key(&self) -> Result<&str, PlacesError> {
        self.api_key
            .as_deref()
            .ok_or(PlacesError::MissingCredentials { provider: PROVIDER })
    }

    /// Text-search cafés matching `query` around `origin`.
    ///
    /// The query is suffixed with "coffee shop" to keep results on-topic.
    /// At most 20 results are returned, in provider order.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::MissingCredentials`] when no API key is configured.
    /// - [`PlacesError::ProviderStatus`] for any status other than `OK` or
    ///   `ZERO_RESULTS`.
    /// - [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`], or
    ///   [`PlacesError::Deserialize`] on transport or payload failures.
    pub async fn search(
        &self,
        query: &str,
        origin: &Coordinates,
    ) -> Result<Vec<ShopCandidate>, PlacesError> {
        let key = self.api_key()?;
        let mut url = join(&self.base_url, "textsearch/json")?;
        url.query_pairs_mut()
            .append_pair("query", format!("{} coffee shop", query.trim()).trim())
            .append_pair("location", &format!("{},{}", origin.lat, origin.lng))
            .append_pair("radius", &self.radius_m.to_string())
            .append_pair("type", "cafe")
            .append_pair("key", key);

        let response = self.client.get(url).send().await?;
        let body: TextSearchResponse = read_json(response, "google textsearch").await?;
        if body.status != "OK" && body.status != "ZERO_RESULTS" {
            return Err(PlacesError::ProviderStatus {
                provider: PROVIDER,
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            });
        }

        Ok(body
            .results
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|p| ShopCandidate {
                coordinates: coordinates(p.geometry.as_ref()),
                id: ShopSource::Primary.namespaced_id(&p.place_id),
                name: p.name,
                address: non_blank(p.formatted_address),
                city: None,
                avg_rating: round_rating(p.rating),
                review_count: p.user_ratings_total.unwrap_or(0),
                distance_km: None,
                distance_miles: None,
                source: ShopSource::Primary,
            })
            .collect())
    }

    /// Fetch rich details for one place id.
    ///
    /// Returns `Ok(None)` when Google reports the id as unknown.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`GooglePlacesClient::search`].
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetail>, PlacesError> {
        let key = self.api_key()?;
        let mut url = join(&self.base_url, "details/json")?;
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("fields", DETAIL_FIELDS)
            .append_pair("key", key);

        let response = self.client.get(url).send().await?;
        let body: DetailsResponse = read_json(response, "google details").await?;
        match body.status.as_str() {
            "OK" => {}
            "NOT_FOUND" | "ZERO_RESULTS" | "INVALID_REQUEST" => return Ok(None),
            _ => {
                return Err(PlacesError::ProviderStatus {
                    provider: PROVIDER,
                    status: body.status,
                    message: body.error_message.unwrap_or_default(),
                })
            }
        }
        let Some(detail) = body.result else {
            return Ok(None);
        };

        let photos = detail
            .photos
            .iter()
            .filter_map(|p| p.photo_reference.as_deref())
            .take(MAX_PHOTOS)
            .filter_map(|reference| self.photo_url(reference, key).ok())
            .collect();

        let reviews = detail
            .reviews
            .into_iter()
            .take(MAX_REVIEWS)
            .map(|r| ExternalReview {
                author: non_blank(r.author_name).unwrap_or_else(|| "User".to_string()),
                rating: r.rating,
                text: r.text.unwrap_or_default(),
                time: r.relative_time_description,
            })
            .collect();

        Ok(Some(PlaceDetail {
            place_id: place_id.to_string(),
            name: detail.name.unwrap_or_default(),
            address: detail.formatted_address.unwrap_or_default(),
            coordinates: coordinates(detail.geometry.as_ref()),
            avg_rating: round_rating(detail.rating),
            review_count: detail.user_ratings_total.unwrap_or(0),
            photos,
            reviews,
            // 0 is Google's "Free" tier.
            price_level: price_symbols(detail.price_level.filter(|&level| level > 0)),
            opening_hours: detail
                .opening_hours
                .map(|h| h.weekday_text)
                .unwrap_or_default(),
            website: non_blank(detail.website),
            source: ShopSource::Primary,
        }))
    }

    fn photo_url(&self, reference: &str, key: &str) -> Result<String, PlacesError> {
        let mut url = join(&self.base_url, "photo")?;
        url.query_pairs_mut()
            .append_pair("maxwidth", "800")
            .append_pair("photo_reference", reference)
            .append_pair("key", key);
        Ok(url.into())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn radius_metres(radius_km: f64) -> u32 {
    (radius_km * 1000.0).round().clamp(1.0, f64::from(u32::MAX)) as u32
}
