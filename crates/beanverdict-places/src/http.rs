//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a `reqwest::Client` with the request deadline and user agent every
/// outbound call in this crate shares.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, PlacesError> {
    Ok(Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .user_agent(user_agent)
        .build()?)
}

/// Parse `base_url`, normalising it to end with exactly one slash so that
/// [`Url::join`] appends to the path rather than replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn join(base: &Url, path: &str) -> Result<Url, PlacesError> {
    base.join(path).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Assert a 2xx status and decode the body as `T`.
///
/// `context` names the call in error messages; it must not contain secrets.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, PlacesError> {
    let status = response.status();
    if !status.is_success() {
        return Err(PlacesError::UnexpectedStatus {
            context: context.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
