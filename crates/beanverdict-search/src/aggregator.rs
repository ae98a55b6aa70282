//! The search orchestrator: local catalog, location resolution, provider
//! fan-out, merge, and ranking for one query.

use std::net::IpAddr;

use beanverdict_core::{Coordinates, PlaceDetail, SearchConfig, SearchResult, ShopSource};
use beanverdict_places::{build_providers, PlaceId, PlaceProvider, PlacesError};
use futures::future::join_all;

use crate::catalog::{query_local_catalog, CatalogStore};
use crate::location::LocationResolver;
use crate::merge::{build_suggestions, merge_shops, ShopSources};
use crate::relevance::rank_drinks;
use crate::SearchError;

/// Queries shorter than this (after trimming) return an empty result.
pub const MIN_QUERY_CHARS: usize = 2;

/// One search as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub coordinates: Option<Coordinates>,
    /// Free-text location, geocoded when no coordinates are given.
    pub location: Option<String>,
    /// Caller address for the IP fallback.
    pub client_ip: Option<IpAddr>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Option<Coordinates>) -> Self {
        self.coordinates = coordinates;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_client_ip(mut self, client_ip: Option<IpAddr>) -> Self {
        self.client_ip = client_ip;
        self
    }
}

/// Trim and lowercase `raw`; `None` when shorter than [`MIN_QUERY_CHARS`].
#[must_use]
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim().to_lowercase();
    (query.chars().count() >= MIN_QUERY_CHARS).then_some(query)
}

pub struct SearchService<C> {
    catalog: C,
    providers: Vec<PlaceProvider>,
    locator: LocationResolver,
}

impl<C: CatalogStore> SearchService<C> {
    #[must_use]
    pub fn new(catalog: C, providers: Vec<PlaceProvider>, locator: LocationResolver) -> Self {
        Self {
            catalog,
            providers,
            locator,
        }
    }

    /// Wire up the production providers and location services.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if any HTTP client cannot be constructed.
    pub fn from_config(catalog: C, config: &SearchConfig) -> Result<Self, PlacesError> {
        Ok(Self::new(
            catalog,
            build_providers(config)?,
            LocationResolver::from_config(config)?,
        ))
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Run one search.
    ///
    /// Provider and location failures only shrink the result. Too-short
    /// queries return an empty result without touching any source.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Catalog`] if the local catalog query fails.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let Some(query) = normalize_query(&request.query) else {
            return Ok(SearchResult::empty());
        };

        // Known coordinates let providers start alongside the local query.
        let (local, origin, remote) = if let Some(origin) = request.coordinates {
            let (local, remote) = tokio::join!(
                query_local_catalog(&self.catalog, &query),
                self.fan_out(&query, &origin)
            );
            (local?, Some(origin), remote)
        } else {
            let (local, resolved) = tokio::join!(
                query_local_catalog(&self.catalog, &query),
                self.locator.resolve(None, request.location.as_deref())
            );
            let local = local?;

            // IP location is only worth the round-trip when nothing else can answer.
            let origin = match resolved {
                Some(coords) => Some(coords),
                None if local.is_empty() => self.locator.locate_by_ip(request.client_ip).await,
                None => None,
            };
            let remote = match origin.as_ref() {
                Some(origin) => self.fan_out(&query, origin).await,
                None => ShopSources::default(),
            };
            (local, origin, remote)
        };

        let mut sources = remote;
        sources.local.splice(0..0, local.shops);
        let shops = merge_shops(sources, origin.as_ref());

        let mut drinks = local.drinks;
        for drink in &mut drinks {
            drink.annotate_distance(origin.as_ref());
        }
        let drinks = rank_drinks(drinks, &query);

        let suggestions = build_suggestions(&shops, &drinks);

        tracing::debug!(
            query = %query,
            has_origin = origin.is_some(),
            shops = shops.len(),
            drinks = drinks.len(),
            suggestions = suggestions.len(),
            "search complete"
        );

        Ok(SearchResult {
            shops,
            drinks,
            suggestions,
        })
    }

    /// Query every configured provider concurrently, bucketed by source.
    async fn fan_out(&self, query: &str, origin: &Coordinates) -> ShopSources {
        let lookups = self.providers.iter().map(|provider| async move {
            (provider.source(), provider.lookup(query, Some(origin)).await)
        });
        let mut sources = ShopSources::default();
        for (source, shops) in join_all(lookups).await {
            match source {
                ShopSource::Primary => sources.primary.extend(shops),
                ShopSource::Budget => sources.budget.extend(shops),
                ShopSource::CommunityMap => sources.community.extend(shops),
                ShopSource::Local => sources.local.extend(shops),
            }
        }
        sources
    }

    /// Fetch provider details for a namespaced place id.
    ///
    /// Returns `None` for local or malformed ids, for ids whose provider is
    /// not configured, and whenever the provider call fails.
    pub async fn place_details(&self, place_id: &str) -> Option<PlaceDetail> {
        let id = PlaceId::parse(place_id)?;
        let provider = self.providers.iter().find(|p| p.source() == id.source())?;
        provider.get_details(&id).await
    }

    /// IP-based coordinates for a caller, bounded by the location timeout.
    pub async fn locate_client(&self, client_ip: Option<IpAddr>) -> Option<Coordinates> {
        self.locator.locate_by_ip(client_ip).await
    }
}
