use axum::{extract::State, Extension, Json};
use beanverdict_core::Coordinates;

use crate::middleware::{ClientIp, RequestId};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn locate_by_ip(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(ClientIp(client_ip)): Extension<ClientIp>,
) -> Result<Json<ApiResponse<Coordinates>>, ApiError> {
    let coords = state.search.locate_client(client_ip).await.ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "location_unavailable",
            "could not determine location from IP",
        )
    })?;

    Ok(Json(ApiResponse {
        data: coords,
        meta: ResponseMeta::new(req_id.0),
    }))
}
