//! Resolve a request's origin from explicit coordinates, a free-text location,
//! or (as a last resort) the caller's IP address.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use beanverdict_core::{Coordinates, SearchConfig};
use beanverdict_places::{IpLocator, NominatimGeocoder, PlacesError};

/// Best-effort coordinate resolution. Nothing here ever fails; every miss,
/// error, or timeout falls through to `None`.
pub struct LocationResolver {
    geocoder: Option<NominatimGeocoder>,
    ip_locator: Option<IpLocator>,
    timeout: Duration,
}

impl LocationResolver {
    #[must_use]
    pub fn new(
        geocoder: Option<NominatimGeocoder>,
        ip_locator: Option<IpLocator>,
        timeout: Duration,
    ) -> Self {
        Self {
            geocoder,
            ip_locator,
            timeout,
        }
    }

    /// A resolver that only honours explicit coordinates.
    #[must_use]
    pub fn explicit_only() -> Self {
        Self::new(None, None, Duration::ZERO)
    }

    /// Build against the public Nominatim and ip-api services.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if an HTTP client cannot be constructed.
    pub fn from_config(config: &SearchConfig) -> Result<Self, PlacesError> {
        let timeout = Duration::from_millis(config.location_timeout_ms);
        Ok(Self::new(
            Some(NominatimGeocoder::new(timeout, &config.user_agent)?),
            Some(IpLocator::new(timeout, &config.user_agent)?),
            timeout,
        ))
    }

    /// Explicit coordinates win; otherwise geocode `location_text`.
    ///
    /// IP fallback is deliberately not attempted here; see [`Self::locate_by_ip`].
    pub async fn resolve(
        &self,
        explicit: Option<Coordinates>,
        location_text: Option<&str>,
    ) -> Option<Coordinates> {
        if explicit.is_some() {
            return explicit;
        }
        let text = location_text.map(str::trim).filter(|t| !t.is_empty())?;
        let geocoder = self.geocoder.as_ref()?;
        self.bounded("geocode", geocoder.geocode(text)).await
    }

    /// Coarse location for `client_ip`. Private or unknown addresses are
    /// resolved against the server's own public address.
    pub async fn locate_by_ip(&self, client_ip: Option<IpAddr>) -> Option<Coordinates> {
        let locator = self.ip_locator.as_ref()?;
        self.bounded("ip_locate", locator.locate(client_ip)).await
    }

    async fn bounded<F>(&self, step: &'static str, call: F) -> Option<Coordinates>
    where
        F: Future<Output = Result<Option<Coordinates>, PlacesError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(coords)) => {
                if coords.is_none() {
                    tracing::debug!(step, "location lookup found no match");
                }
                coords
            }
            Ok(Err(e)) => {
                tracing::warn!(step, error = %e, "location lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    step,
                    timeout_ms = self.timeout.as_millis(),
                    "location lookup timed out"
                );
                None
            }
        }
    }
}
