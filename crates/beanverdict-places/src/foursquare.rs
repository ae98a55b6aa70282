//! Client for the Foursquare Places v3 API (the budget commercial provider).

use std::time::Duration;

use beanverdict_core::{Coordinates, ExternalReview, PlaceDetail, ShopCandidate, ShopSource};
use reqwest::{header, Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{build_client, join, parse_base_url, read_json};
use crate::normalize::{join_address, non_blank, price_symbols, round_rating};

const PROVIDER: &str = "foursquare";
const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v3/";
/// Foursquare category id for "Coffee Shop".
const COFFEE_CATEGORY: &str = "13032";
const SEARCH_LIMIT: &str = "30";
const MAX_RADIUS_M: u32 = 100_000;
const MAX_PHOTOS: usize = 12;
const MAX_TIPS: usize = 5;
const PHOTO_SIZE: &str = "800x600";
const DETAIL_FIELDS: &str =
    "fsq_id,name,geocodes,location,rating,stats,photos,website,hours,price,tips";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<FsqPlace>,
}

#[derive(Debug, Deserialize)]
struct FsqPlace {
    fsq_id: String,
    #[serde(default)]
    name: String,
    location: Option<FsqLocation>,
    geocodes: Option<FsqGeocodes>,
    rating: Option<f64>,
    stats: Option<FsqStats>,
    #[serde(default)]
    photos: Vec<FsqPhoto>,
    #[serde(default)]
    tips: Vec<FsqTip>,
    price: Option<i64>,
    hours: Option<FsqHours>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FsqLocation {
    formatted_address: Option<String>,
    address: Option<String>,
    locality: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FsqGeocodes {
    main: Option<FsqPoint>,
    roof: Option<FsqPoint>,
}

#[derive(Debug, Deserialize)]
struct FsqPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct FsqStats {
    total_ratings: Option<i64>,
    total_photos: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FsqPhoto {
    prefix: Option<String>,
    suffix: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FsqTip {
    text: Option<String>,
    created_at: Option<String>,
    user: Option<FsqUser>,
}

#[derive(Debug, Deserialize)]
struct FsqUser {
    first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FsqHours {
    display: Option<String>,
}

impl FsqPlace {
    fn address(&self) -> Option<String> {
        let location = self.location.as_ref()?;
        non_blank(location.formatted_address.clone()).or_else(|| {
            join_address([
                location.address.as_deref(),
                location.locality.as_deref(),
                location.region.as_deref(),
            ])
        })
    }

    fn coordinates(&self) -> Option<Coordinates> {
        let geocodes = self.geocodes.as_ref()?;
        geocodes
            .main
            .as_ref()
            .or(geocodes.roof.as_ref())
            .and_then(|p| Coordinates::from_parts(Some(p.latitude), Some(p.longitude)))
    }

    /// Foursquare rates on a 0–10 scale; candidates carry 0–5.
    fn rating(&self) -> Option<f64> {
        round_rating(self.rating.map(|r| r / 2.0))
    }

    fn review_count(&self) -> i64 {
        self.stats
            .as_ref()
            .and_then(|s| s.total_ratings.or(s.total_photos))
            .unwrap_or(0)
    }
}

/// Client for Foursquare place search and place details.
pub struct FoursquareClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    radius_m: u32,
    timeout: Duration,
}

impl FoursquareClient {
    /// Creates a client pointed at the production Foursquare API.
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
            radius_m: capped_radius_metres(radius_km),
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

    /// Search coffee shops matching `query` around `origin`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::MissingCredentials`] when no API key is configured.
    /// - [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`], or
    ///   [`PlacesError::Deserialize`] on transport or payload failures.
    pub async fn search(
        &self,
        query: &str,
        origin: &Coordinates,
    ) -> Result<Vec<ShopCandidate>, PlacesError> {
        let key = self.api_key()?;
        let mut url = join(&self.base_url, "places/search")?;
        url.query_pairs_mut()
            .append_pair("query", format!("{} coffee", query.trim()).trim())
            .append_pair("ll", &format!("{},{}", origin.lat, origin.lng))
            .append_pair("radius", &self.radius_m.to_string())
            .append_pair("limit", SEARCH_LIMIT)
            .append_pair("categories", COFFEE_CATEGORY);

        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let body: SearchResponse = read_json(response, "foursquare search").await?;

        Ok(body
            .results
            .into_iter()
            .filter(|p| !p.fsq_id.is_empty())
            .map(|p| ShopCandidate {
                id: ShopSource::Budget.namespaced_id(&p.fsq_id),
                address: p.address(),
                coordinates: p.coordinates(),
                avg_rating: p.rating(),
                review_count: p.review_count(),
                name: p.name,
                city: p.location.and_then(|l| non_blank(l.locality)),
                distance_km: None,
                distance_miles: None,
                source: ShopSource::Budget,
            })
            .collect())
    }

    /// Fetch rich details for one Foursquare id (without the `fsq-` prefix).
    ///
    /// Tips stand in for reviews. Returns `Ok(None)` on HTTP 404.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`FoursquareClient::search`].
    pub async fn place_details(&self, fsq_id: &str) -> Result<Option<PlaceDetail>, PlacesError> {
        let key = self.api_key()?;
        let mut url = join(&self.base_url, "places/")?;
        url.path_segments_mut()
            .map_err(|()| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(fsq_id);
        url.query_pairs_mut().append_pair("fields", DETAIL_FIELDS);

        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let place: FsqPlace = read_json(response, "foursquare details").await?;

        let photos = place
            .photos
            .iter()
            .filter_map(|ph| match (ph.prefix.as_deref(), ph.suffix.as_deref()) {
                (Some(prefix), Some(suffix)) if !prefix.is_empty() && !suffix.is_empty() => {
                    Some(format!("{prefix}{PHOTO_SIZE}{suffix}"))
                }
                _ => None,
            })
            .take(MAX_PHOTOS)
            .collect();

        let reviews = place
            .tips
            .iter()
            .take(MAX_TIPS)
            .map(|t| ExternalReview {
                author: t
                    .user
                    .as_ref()
                    .and_then(|u| non_blank(u.first_name.clone()))
                    .unwrap_or_else(|| "User".to_string()),
                rating: None,
                text: t.text.clone().unwrap_or_default(),
                time: t.created_at.clone(),
            })
            .collect();

        Ok(Some(PlaceDetail {
            place_id: ShopSource::Budget.namespaced_id(&place.fsq_id),
            address: place.address().unwrap_or_default(),
            coordinates: place.coordinates(),
            avg_rating: place.rating(),
            review_count: place.review_count(),
            photos,
            reviews,
            price_level: price_symbols(place.price),
            opening_hours: place
                .hours
                .and_then(|h| non_blank(h.display))
                .into_iter()
                .collect(),
            website: non_blank(place.website),
            name: place.name,
            source: ShopSource::Budget,
        }))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn capped_radius_metres(radius_km: f64) -> u32 {
    (radius_km * 1000.0)
        .round()
        .clamp(1.0, f64::from(MAX_RADIUS_M)) as u32
}
