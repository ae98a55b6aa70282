use axum::{
    extract::{Path, State},
    Extension, Json,
};
use beanverdict_search::ShopDetail;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Local shop ids are positive integers.
fn parse_shop_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok().filter(|id| *id >= 1)
}

pub(super) async fn get_shop(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop_id): Path<String>,
) -> Result<Json<ApiResponse<ShopDetail>>, ApiError> {
    let shop_id = parse_shop_id(&shop_id).ok_or_else(|| {
        ApiError::new(req_id.0.clone(), "validation_error", "invalid shop id")
    })?;

    let detail = beanverdict_search::load_shop_detail(&state.pool, shop_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("shop {shop_id} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: detail,
        meta: ResponseMeta::new(req_id.0),
    }))
}
