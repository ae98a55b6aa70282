mod drinks;
mod location;
mod places;
mod search;
mod shops;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use beanverdict_search::{PgCatalog, SearchService};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{client_ip, request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub search: Arc<SearchService<PgCatalog>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "location_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &beanverdict_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/search", get(search::search))
        .route("/api/places/{place_id}", get(places::get_place))
        .route("/api/shops/{shop_id}", get(shops::get_shop))
        .route("/api/drinks/popular", get(drinks::list_popular_drinks))
        .route("/api/drinks/suggest", get(drinks::suggest_drinks))
        .route("/api/location/ip", get(location::locate_by_ip))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn(client_ip)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match beanverdict_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use beanverdict_search::LocationResolver;
    use tower::ServiceExt;

    fn state_for(pool: PgPool) -> AppState {
        let search = SearchService::new(
            PgCatalog::new(pool.clone()),
            Vec::new(),
            LocationResolver::explicit_only(),
        );
        AppState {
            pool,
            search: Arc::new(search),
        }
    }

    /// A pool that never connects; fine for routes that do not reach the database.
    fn offline_state() -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .expect("lazy pool");
        state_for(pool)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("not_found", StatusCode::NOT_FOUND),
            ("validation_error", StatusCode::BAD_REQUEST),
            ("location_unavailable", StatusCode::SERVICE_UNAVAILABLE),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(ApiError::new("req-1", code, "x").into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn short_query_returns_empty_result() {
        let (status, json) = get_json(build_app(offline_state()), "/api/search?q=a").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["shops"], serde_json::json!([]));
        assert_eq!(json["data"]["drinks"], serde_json::json!([]));
        assert_eq!(json["data"]["suggestions"], serde_json::json!([]));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn out_of_range_latitude_is_a_validation_error() {
        let (status, json) =
            get_json(build_app(offline_state()), "/api/search?q=latte&lat=95&lng=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn empty_coordinates_are_ignored() {
        let (status, json) =
            get_json(build_app(offline_state()), "/api/search?q=a&lat=&lng=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["shops"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn non_numeric_latitude_is_a_validation_error() {
        let (status, json) =
            get_json(build_app(offline_state()), "/api/search?q=latte&lat=abc&lng=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["error"]["message"], "lat must be a number");
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let (status, json) = get_json(build_app(offline_state()), "/api/places/17").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn malformed_shop_id_is_a_validation_error() {
        for uri in ["/api/shops/abc", "/api/shops/0"] {
            let (status, json) = get_json(build_app(offline_state()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"]["code"], "validation_error");
        }
    }

    #[tokio::test]
    async fn blank_drink_prefix_suggests_nothing() {
        let (status, json) =
            get_json(build_app(offline_state()), "/api/drinks/suggest?q=%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn ip_location_unavailable_is_503() {
        let (status, json) = get_json(build_app(offline_state()), "/api/location/ip").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "location_unavailable");
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let response = build_app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/search?q=a")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    // -------------------------------------------------------------------------
    // Live database routes
    // -------------------------------------------------------------------------

    async fn seed_latte(pool: &PgPool) {
        let shop_id: i64 = sqlx::query_scalar(
            "INSERT INTO shops (name, address, city, lat, lng) \
             VALUES ('Merit Coffee', '1 Congress Ave', 'Austin', 30.288, -97.74) RETURNING id",
        )
        .fetch_one(pool)
        .await
        .expect("insert shop");
        let drink_id: i64 = sqlx::query_scalar(
            "INSERT INTO drinks (shop_id, drink_type, display_name) \
             VALUES ($1, 'oat milk latte', 'Oat Milk Latte') RETURNING id",
        )
        .bind(shop_id)
        .fetch_one(pool)
        .await
        .expect("insert drink");
        for rating in [4_i16, 5, 4, 5] {
            sqlx::query("INSERT INTO drink_reviews (drink_id, rating) VALUES ($1, $2)")
                .bind(drink_id)
                .bind(rating)
                .execute(pool)
                .await
                .expect("insert review");
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_ok(pool: PgPool) {
        let (status, json) = get_json(build_app(state_for(pool)), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["database"], "ok");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_returns_local_drinks_with_distance(pool: PgPool) {
        seed_latte(&pool).await;
        let (status, json) = get_json(
            build_app(state_for(pool)),
            "/api/search?q=Latte&lat=30.27&lng=-97.74",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let drink = &json["data"]["drinks"][0];
        assert_eq!(drink["displayName"], "Oat Milk Latte");
        assert_eq!(drink["shopName"], "Merit Coffee");
        assert_eq!(drink["reviewCount"], 4);
        assert_eq!(drink["avgRating"].as_f64(), Some(4.5));
        assert_eq!(drink["distanceKm"].as_f64(), Some(2.0));
        assert_eq!(json["data"]["suggestions"][0], "Oat Milk Latte");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn popular_drinks_lists_display_names(pool: PgPool) {
        seed_latte(&pool).await;
        let (status, json) = get_json(build_app(state_for(pool)), "/api/drinks/popular").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], serde_json::json!(["Oat Milk Latte"]));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn shop_detail_lists_menu_reviews_and_overall_rating(pool: PgPool) {
        seed_latte(&pool).await;
        let shop_id: i64 = sqlx::query_scalar("SELECT id FROM shops WHERE name = 'Merit Coffee'")
            .fetch_one(&pool)
            .await
            .expect("shop id");
        let extra = [
            ("pumpkin spice latte", "Pumpkin Spice Latte"),
            ("latte", "Latte"),
        ];
        for (drink_type, display) in extra {
            sqlx::query(
                "INSERT INTO drinks (shop_id, drink_type, display_name) VALUES ($1, $2, $3)",
            )
            .bind(shop_id)
            .bind(drink_type)
            .bind(display)
            .execute(&pool)
            .await
            .expect("insert drink");
        }

        let (status, json) =
            get_json(build_app(state_for(pool)), &format!("/api/shops/{shop_id}")).await;

        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["shop"]["name"], "Merit Coffee");
        assert_eq!(data["shop"]["avgRating"].as_f64(), Some(4.5));
        assert_eq!(data["shop"]["reviewCount"], 4);

        let names: Vec<_> = data["drinks"]
            .as_array()
            .expect("drinks array")
            .iter()
            .map(|d| d["displayName"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["Latte", "Oat Milk Latte", "Pumpkin Spice Latte"]);
        assert_eq!(data["drinks"][2]["isSeasonal"], true);
        assert_eq!(data["drinks"][1]["reviewCount"], 4);

        let reviews = data["reviews"].as_array().expect("reviews array");
        assert_eq!(reviews.len(), 4);
        assert_eq!(reviews[0]["drinkName"], "Oat Milk Latte");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn missing_shop_is_not_found(pool: PgPool) {
        let (status, json) = get_json(build_app(state_for(pool)), "/api/shops/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn drink_suggestions_match_prefix(pool: PgPool) {
        seed_latte(&pool).await;
        let (status, json) =
            get_json(build_app(state_for(pool)), "/api/drinks/suggest?q=OAT").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], serde_json::json!(["Oat Milk Latte"]));
    }
}
