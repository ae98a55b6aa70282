use axum::{
    extract::{Query, State},
    Extension, Json,
};
use beanverdict_core::{Coordinates, SearchResult};
use beanverdict_search::SearchRequest;
use serde::Deserialize;

use crate::middleware::{ClientIp, RequestId};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// `lat`/`lng` arrive as raw strings so that `?lat=&lng=` reads as absent
/// instead of failing extraction.
#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub location: Option<String>,
}

fn parse_coordinate(raw: Option<&str>, name: &'static str) -> Result<Option<f64>, String> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| format!("{name} must be a number")),
    }
}

fn validate_coordinates(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinates>, &'static str> {
    if lat.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        return Err("lat must be between -90 and 90");
    }
    if lng.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
        return Err("lng must be between -180 and 180");
    }
    Ok(Coordinates::from_parts(lat, lng))
}

fn request_coordinates(query: &SearchQuery) -> Result<Option<Coordinates>, String> {
    let lat = parse_coordinate(query.lat.as_deref(), "lat")?;
    let lng = parse_coordinate(query.lng.as_deref(), "lng")?;
    validate_coordinates(lat, lng).map_err(String::from)
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(ClientIp(client_ip)): Extension<ClientIp>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let coordinates = request_coordinates(&query)
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    let request = SearchRequest::new(query.q.unwrap_or_default())
        .with_coordinates(coordinates)
        .with_location(query.location)
        .with_client_ip(client_ip);

    let data = state.search.search(&request).await.map_err(|e| {
        tracing::error!(error = %e, "search failed");
        ApiError::new(req_id.0.clone(), "internal_error", "search failed")
    })?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
