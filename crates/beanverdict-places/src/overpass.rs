//! Client for the OpenStreetMap Overpass API (the community map provider).
//!
//! Overpass does no text ranking: a lookup enumerates every café node inside
//! a radius of the origin. No key is required.

use std::collections::HashMap;
use std::time::Duration;

use beanverdict_core::{Coordinates, PlaceDetail, ShopCandidate, ShopSource};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{build_client, read_json};
use crate::normalize::{join_address, non_blank};

const DEFAULT_INTERPRETER_URL: &str = "https://overpass-api.de/api/interpreter";
const DEFAULT_NAME: &str = "Coffee Shop";
const MAX_RESULTS: usize = 25;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassNode>,
}

#[derive(Debug, Deserialize)]
struct OverpassNode {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassNode {
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn name(&self) -> String {
        self.tag("name").unwrap_or(DEFAULT_NAME).to_string()
    }

    fn address(&self) -> Option<String> {
        if self.tag("addr:street").is_some() {
            join_address([
                self.tag("addr:housenumber"),
                self.tag("addr:street"),
                self.tag("addr:city"),
            ])
        } else {
            self.tag("addr:full").map(str::to_string)
        }
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lon).or_else(|| {
            self.center
                .as_ref()
                .and_then(|c| Coordinates::from_parts(Some(c.lat), Some(c.lon)))
        })
    }
}

fn around_query(origin: &Coordinates, radius_m: u32) -> String {
    let around = format!("around:{radius_m},{},{}", origin.lat, origin.lng);
    format!(
        "[out:json][timeout:10];\
         (node[\"amenity\"=\"cafe\"]({around});node[\"amenity\"=\"coffee_shop\"]({around}););\
         out center;"
    )
}

fn node_query(node_id: i64) -> String {
    format!("[out:json][timeout:10];node({node_id});out;")
}

/// Client for café enumeration via Overpass QL.
pub struct OverpassClient {
    client: Client,
    interpreter_url: Url,
    radius_m: u32,
    timeout: Duration,
}

impl OverpassClient {
    /// Creates a client pointed at the public Overpass interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, radius_km: f64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(timeout, radius_km, user_agent, DEFAULT_INTERPRETER_URL)
    }

    /// Creates a client against a custom interpreter URL (for testing with wiremock).
    ///
    /// Unlike the other clients, `interpreter_url` is the full endpoint and is
    /// used verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the client cannot be built, or
    /// [`PlacesError::InvalidBaseUrl`] if the URL does not parse.
    pub fn with_base_url(
        timeout: Duration,
        radius_km: f64,
        user_agent: &str,
        interpreter_url: &str,
    ) -> Result<Self, PlacesError> {
        let interpreter_url =
            Url::parse(interpreter_url).map_err(|e| PlacesError::InvalidBaseUrl {
                url: interpreter_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            interpreter_url,
            radius_m: radius_metres(radius_km),
            timeout,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run(&self, ql: String, context: &str) -> Result<OverpassResponse, PlacesError> {
        let response = self
            .client
            .post(self.interpreter_url.clone())
            .form(&[("data", ql)])
            .send()
            .await?;
        read_json(response, context).await
    }

    /// List café nodes within the configured radius of `origin`.
    ///
    /// Results carry no rating and zero reviews. At most 25 are returned.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`], or
    /// [`PlacesError::Deserialize`] on transport or payload failures.
    pub async fn search_nearby(
        &self,
        origin: &Coordinates,
    ) -> Result<Vec<ShopCandidate>, PlacesError> {
        let body = self
            .run(around_query(origin, self.radius_m), "overpass around")
            .await?;

        Ok(body
            .elements
            .into_iter()
            .take(MAX_RESULTS)
            .map(|node| ShopCandidate {
                id: ShopSource::CommunityMap.namespaced_id(&node.id.to_string()),
                name: node.name(),
                address: node.address(),
                city: node.tag("addr:city").map(str::to_string),
                coordinates: node.coordinates(),
                avg_rating: None,
                review_count: 0,
                distance_km: None,
                distance_miles: None,
                source: ShopSource::CommunityMap,
            })
            .collect())
    }

    /// Fetch a single node by its OSM id.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`OverpassClient::search_nearby`].
    pub async fn node_details(&self, node_id: i64) -> Result<Option<PlaceDetail>, PlacesError> {
        let body = self.run(node_query(node_id), "overpass node").await?;
        let Some(node) = body.elements.into_iter().find(|n| n.id == node_id) else {
            return Ok(None);
        };

        let website = node
            .tag("website")
            .or_else(|| node.tag("contact:website"))
            .map(str::to_string);
        Ok(Some(PlaceDetail {
            place_id: ShopSource::CommunityMap.namespaced_id(&node_id.to_string()),
            name: node.name(),
            address: node.address().unwrap_or_default(),
            coordinates: node.coordinates(),
            avg_rating: None,
            review_count: 0,
            photos: Vec::new(),
            reviews: Vec::new(),
            price_level: None,
            opening_hours: non_blank(node.tag("opening_hours").map(str::to_string))
                .into_iter()
                .collect(),
            website,
            source: ShopSource::CommunityMap,
        }))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn radius_metres(radius_km: f64) -> u32 {
    (radius_km * 1000.0).round().clamp(1.0, f64::from(u32::MAX)) as u32
}
