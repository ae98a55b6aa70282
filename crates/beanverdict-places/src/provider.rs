//! The uniform provider boundary the aggregator talks to.
//!
//! Every call here is infallible from the caller's point of view: errors and
//! timeouts are logged and collapse to an empty list or `None`.

use std::future::Future;
use std::time::Duration;

use beanverdict_core::{Coordinates, PlaceDetail, SearchConfig, ShopCandidate, ShopSource};

use crate::error::PlacesError;
use crate::foursquare::FoursquareClient;
use crate::google::GooglePlacesClient;
use crate::overpass::OverpassClient;

/// A provider-namespaced place id, parsed for detail dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceId {
    Primary(String),
    /// Native Foursquare id, prefix stripped.
    Budget(String),
    CommunityMap(i64),
}

impl PlaceId {
    /// Parse an external place id. Returns `None` for blank, malformed, or
    /// local (bare integer) ids.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match ShopSource::for_place_id(raw)? {
            ShopSource::CommunityMap => raw
                .strip_prefix("osm-")
                .and_then(|id| id.parse::<i64>().ok())
                .map(PlaceId::CommunityMap),
            ShopSource::Budget => raw
                .strip_prefix("fsq-")
                .filter(|id| !id.is_empty())
                .map(|id| PlaceId::Budget(id.to_string())),
            ShopSource::Primary => Some(PlaceId::Primary(raw.to_string())),
            ShopSource::Local => None,
        }
    }

    #[must_use]
    pub fn source(&self) -> ShopSource {
        match self {
            PlaceId::Primary(_) => ShopSource::Primary,
            PlaceId::Budget(_) => ShopSource::Budget,
            PlaceId::CommunityMap(_) => ShopSource::CommunityMap,
        }
    }
}

/// One external shop source.
pub enum PlaceProvider {
    Primary(GooglePlacesClient),
    Budget(FoursquareClient),
    CommunityMap(OverpassClient),
}

impl PlaceProvider {
    #[must_use]
    pub fn source(&self) -> ShopSource {
        match self {
            PlaceProvider::Primary(_) => ShopSource::Primary,
            PlaceProvider::Budget(_) => ShopSource::Budget,
            PlaceProvider::CommunityMap(_) => ShopSource::CommunityMap,
        }
    }

    fn timeout(&self) -> Duration {
        match self {
            PlaceProvider::Primary(c) => c.timeout(),
            PlaceProvider::Budget(c) => c.timeout(),
            PlaceProvider::CommunityMap(c) => c.timeout(),
        }
    }

    /// Look up shops for `query` near `origin`.
    ///
    /// Without an origin nothing is requested and the result is empty. Any
    /// failure, including exceeding the provider timeout, yields an empty list.
    pub async fn lookup(&self, query: &str, origin: Option<&Coordinates>) -> Vec<ShopCandidate> {
        let source = self.source();
        let Some(origin) = origin else {
            tracing::debug!(provider = %source, "no coordinates; skipping provider lookup");
            return Vec::new();
        };

        let result = match self {
            PlaceProvider::Primary(c) => self.bounded(c.search(query, origin)).await,
            PlaceProvider::Budget(c) => self.bounded(c.search(query, origin)).await,
            PlaceProvider::CommunityMap(c) => self.bounded(c.search_nearby(origin)).await,
        };

        match result {
            Ok(shops) => {
                tracing::debug!(provider = %source, count = shops.len(), "provider lookup complete");
                shops
            }
            Err(e) => {
                log_degraded(source, "lookup", &e);
                Vec::new()
            }
        }
    }

    /// Fetch details for `id` if this provider owns it.
    pub async fn get_details(&self, id: &PlaceId) -> Option<PlaceDetail> {
        let source = self.source();
        let result = match (self, id) {
            (PlaceProvider::Primary(c), PlaceId::Primary(native)) => {
                self.bounded(c.place_details(native)).await
            }
            (PlaceProvider::Budget(c), PlaceId::Budget(native)) => {
                self.bounded(c.place_details(native)).await
            }
            (PlaceProvider::CommunityMap(c), PlaceId::CommunityMap(node)) => {
                self.bounded(c.node_details(*node)).await
            }
            _ => return None,
        };

        match result {
            Ok(detail) => detail,
            Err(e) => {
                log_degraded(source, "details", &e);
                None
            }
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, PlacesError>
    where
        F: Future<Output = Result<T, PlacesError>>,
    {
        let timeout = self.timeout();
        tokio::time::timeout(timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(PlacesError::Timeout {
                    provider: self.source().as_str(),
                    timeout_ms: timeout.as_millis(),
                })
            })
    }
}

fn log_degraded(source: ShopSource, operation: &str, error: &PlacesError) {
    match error {
        PlacesError::MissingCredentials { .. } => {
            tracing::debug!(provider = %source, operation, "provider not configured; skipping");
        }
        _ => {
            tracing::warn!(provider = %source, operation, error = %error, "provider call failed; degrading to empty");
        }
    }
}

/// Build the fixed provider list from search configuration.
///
/// Both commercial providers are always present; without a key they log and
/// contribute nothing. The community map provider can be switched off.
///
/// # Errors
///
/// Returns [`PlacesError::Http`] if an HTTP client cannot be constructed.
pub fn build_providers(config: &SearchConfig) -> Result<Vec<PlaceProvider>, PlacesError> {
    let timeout = Duration::from_millis(config.provider_timeout_ms);
    let mut providers = vec![
        PlaceProvider::Primary(GooglePlacesClient::new(
            config.primary_provider_key.as_deref(),
            timeout,
            config.search_radius_km,
            &config.user_agent,
        )?),
        PlaceProvider::Budget(FoursquareClient::new(
            config.budget_provider_key.as_deref(),
            timeout,
            config.search_radius_km,
            &config.user_agent,
        )?),
    ];
    if config.enable_community_map_provider {
        providers.push(PlaceProvider::CommunityMap(OverpassClient::new(
            timeout,
            config.community_radius_km,
            &config.user_agent,
        )?));
    }
    Ok(providers)
}
