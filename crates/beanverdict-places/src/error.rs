use thiserror::Error;

/// Errors returned by the external place, geocoding, and IP-location clients.
///
/// These never cross a [`crate::PlaceProvider`] boundary; the provider layer
/// logs them and degrades to an empty contribution.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider needs an API key and none is configured.
    #[error("{provider} is not configured with an API key")]
    MissingCredentials { provider: &'static str },

    /// Non-2xx HTTP status.
    #[error("{context} returned HTTP {status}")]
    UnexpectedStatus { context: String, status: u16 },

    /// The API answered 200 but reported a failure in its own envelope.
    #[error("{provider} API status {status}: {message}")]
    ProviderStatus {
        provider: &'static str,
        status: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The call did not settle before its deadline.
    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        timeout_ms: u128,
    },
}
