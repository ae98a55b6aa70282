use axum::{
    extract::{Query, State},
    Extension, Json,
};
use beanverdict_db::DbError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const POPULAR_DRINKS_LIMIT: i64 = 24;
const DRINK_SUGGESTION_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct SuggestQuery {
    pub q: Option<String>,
}

pub(super) async fn list_popular_drinks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let data = beanverdict_db::list_popular_drinks(&state.pool, POPULAR_DRINKS_LIMIT)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &DbError::from(e)))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Autocomplete over drink names. A blank prefix returns no suggestions.
pub(super) async fn suggest_drinks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let needle = query.q.unwrap_or_default().trim().to_lowercase();
    let data = if needle.is_empty() {
        Vec::new()
    } else {
        beanverdict_db::suggest_drink_names(&state.pool, &needle, DRINK_SUGGESTION_LIMIT)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &DbError::from(e)))?
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
