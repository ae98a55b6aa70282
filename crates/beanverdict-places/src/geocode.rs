//! Free-text location geocoding via Nominatim.

use std::time::Duration;

use beanverdict_core::Coordinates;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{build_client, join, parse_base_url, read_json};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

#[derive(Debug, Deserialize)]
struct NominatimMatch {
    lat: String,
    lon: String,
}

/// Resolves a place name or address to coordinates, taking only the best match.
pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
}

impl NominatimGeocoder {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(timeout, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the client cannot be built, or
    /// [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout: Duration,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Geocode `location`. Returns `Ok(None)` for blank input or no match.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`], or
    /// [`PlacesError::Deserialize`] on transport or payload failures.
    pub async fn geocode(&self, location: &str) -> Result<Option<Coordinates>, PlacesError> {
        let location = location.trim();
        if location.is_empty() {
            return Ok(None);
        }

        let mut url = join(&self.base_url, "search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", location)
            .append_pair("limit", "1");

        let response = self.client.get(url).send().await?;
        let matches: Vec<NominatimMatch> = read_json(response, "nominatim search").await?;

        Ok(matches.first().and_then(|m| {
            Coordinates::from_parts(m.lat.trim().parse().ok(), m.lon.trim().parse().ok())
        }))
    }
}
