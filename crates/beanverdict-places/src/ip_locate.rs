//! Coarse, city-level geolocation of a client IP via ip-api.com.

use std::net::IpAddr;
use std::time::Duration;

use beanverdict_core::Coordinates;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{build_client, join, parse_base_url, read_json};

// ip-api's free tier is HTTP only.
const DEFAULT_BASE_URL: &str = "http://ip-api.com/";
const FIELDS: &str = "lat,lon,status";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Whether an address could plausibly be geolocated by a public service.
///
/// Loopback, private, link-local, unspecified, and IPv6 unique-local ranges
/// are not. IPv4-mapped IPv6 addresses are judged by their IPv4 form.
#[must_use]
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            let unique_local = (first & 0xfe00) == 0xfc00;
            let link_local = (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}

/// Looks up approximate coordinates for a client address.
pub struct IpLocator {
    client: Client,
    base_url: Url,
}

impl IpLocator {
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

    fn lookup_url(&self, client_ip: Option<IpAddr>) -> Result<Url, PlacesError> {
        // A private or unknown caller is located by the server's own public IP.
        let path = match client_ip.filter(|ip| is_public_ip(*ip)) {
            Some(ip) => format!("json/{ip}"),
            None => "json".to_string(),
        };
        let mut url = join(&self.base_url, &path)?;
        url.query_pairs_mut().append_pair("fields", FIELDS);
        Ok(url)
    }

    /// Locate `client_ip`. Returns `Ok(None)` unless the service reports success.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`], or
    /// [`PlacesError::Deserialize`] on transport or payload failures.
    pub async fn locate(&self, client_ip: Option<IpAddr>) -> Result<Option<Coordinates>, PlacesError> {
        let url = self.lookup_url(client_ip)?;
        let response = self.client.get(url).send().await?;
        let body: IpApiResponse = read_json(response, "ip-api lookup").await?;
        if body.status != "success" {
            return Ok(None);
        }
        Ok(Coordinates::from_parts(body.lat, body.lon))
    }
}
