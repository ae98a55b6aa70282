//! Integration tests for `GooglePlacesClient` using wiremock HTTP mocks.

use std::time::Duration;

use beanverdict_core::{Coordinates, ShopSource};
use beanverdict_places::{GooglePlacesClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUSTIN: Coordinates = Coordinates {
    lat: 30.2672,
    lng: -97.7431,
};

fn test_client(base_url: &str) -> GooglePlacesClient {
    GooglePlacesClient::with_base_url(
        Some("test-key"),
        Duration::from_secs(5),
        50.0,
        "beanverdict-test",
        base_url,
    )
    .expect("client construction should not fail")
}

#[tokio::test]
async fn search_maps_results_and_biases_query() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "place_id": "ChIJmerit",
                "name": "Merit Coffee",
                "formatted_address": "1200 S Lamar Blvd, Austin, TX",
                "geometry": { "location": { "lat": 30.2522, "lng": -97.7645 } },
                "rating": 4.56,
                "user_ratings_total": 812
            },
            {
                "place_id": "ChIJnogeo",
                "name": "Mystery Cafe"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "latte coffee shop"))
        .and(query_param("location", "30.2672,-97.7431"))
        .and(query_param("radius", "50000"))
        .and(query_param("type", "cafe"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let shops = test_client(&server.uri())
        .search("latte", &AUSTIN)
        .await
        .expect("search should succeed");

    assert_eq!(shops.len(), 2);
    assert_eq!(shops[0].id, "ChIJmerit");
    assert_eq!(shops[0].source, ShopSource::Primary);
    assert_eq!(shops[0].avg_rating, Some(4.6));
    assert_eq!(shops[0].review_count, 812);
    assert_eq!(shops[0].coordinates, Some(Coordinates::new(30.2522, -97.7645)));
    assert!(shops[0].distance_km.is_none());
    assert!(shops[1].coordinates.is_none());
    assert_eq!(shops[1].review_count, 0);
}

#[tokio::test]
async fn search_truncates_to_twenty_results() {
    let server = MockServer::start().await;
    let results: Vec<_> = (0..25)
        .map(|i| serde_json::json!({ "place_id": format!("p{i}"), "name": format!("Cafe {i}") }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OK", "results": results })),
        )
        .mount(&server)
        .await;

    let shops = test_client(&server.uri())
        .search("mocha", &AUSTIN)
        .await
        .unwrap();
    assert_eq!(shops.len(), 20);
}

#[tokio::test]
async fn zero_results_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ZERO_RESULTS" })),
        )
        .mount(&server)
        .await;

    let shops = test_client(&server.uri())
        .search("xyzzy", &AUSTIN)
        .await
        .unwrap();
    assert!(shops.is_empty());
}

#[tokio::test]
async fn request_denied_surfaces_provider_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("latte", &AUSTIN)
        .await
        .unwrap_err();
    assert!(
        matches!(err, PlacesError::ProviderStatus { ref status, .. } if status == "REQUEST_DENIED"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn details_map_photos_reviews_and_price() {
    let server = MockServer::start().await;
    let photos: Vec<_> = (0..15)
        .map(|i| serde_json::json!({ "photo_reference": format!("ref{i}") }))
        .collect();
    let body = serde_json::json!({
        "status": "OK",
        "result": {
            "name": "Merit Coffee",
            "formatted_address": "1200 S Lamar Blvd, Austin, TX",
            "geometry": { "location": { "lat": 30.2522, "lng": -97.7645 } },
            "rating": 4.5,
            "user_ratings_total": 812,
            "photos": photos,
            "opening_hours": { "weekday_text": ["Monday: 7:00 AM – 6:00 PM"] },
            "price_level": 2,
            "reviews": [
                { "author_name": "Sam", "rating": 5, "text": "Great cortado", "relative_time_description": "a week ago" },
                { "rating": 4, "text": "Solid" }
            ],
            "website": "https://meritcoffee.com"
        }
    });

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "ChIJmerit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let detail = test_client(&server.uri())
        .place_details("ChIJmerit")
        .await
        .unwrap()
        .expect("detail present");

    assert_eq!(detail.place_id, "ChIJmerit");
    assert_eq!(detail.photos.len(), 12);
    assert!(detail.photos[0].contains("photo_reference=ref0"));
    assert_eq!(detail.price_level.as_deref(), Some("$$"));
    assert_eq!(detail.reviews.len(), 2);
    assert_eq!(detail.reviews[0].author, "Sam");
    assert_eq!(detail.reviews[1].author, "User");
    assert_eq!(detail.opening_hours.len(), 1);
    assert_eq!(detail.website.as_deref(), Some("https://meritcoffee.com"));
}

#[tokio::test]
async fn free_price_level_has_no_symbols() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "ChIJfree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": { "name": "Library Coffee Cart", "price_level": 0 }
        })))
        .mount(&server)
        .await;

    let detail = test_client(&server.uri())
        .place_details("ChIJfree")
        .await
        .unwrap()
        .expect("detail present");

    assert_eq!(detail.name, "Library Coffee Cart");
    assert!(detail.price_level.is_none());
}

#[tokio::test]
async fn details_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "NOT_FOUND" })),
        )
        .mount(&server)
        .await;

    let detail = test_client(&server.uri()).place_details("gone").await.unwrap();
    assert!(detail.is_none());
}

#[tokio::test]
async fn missing_key_never_calls_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GooglePlacesClient::with_base_url(
        None,
        Duration::from_secs(5),
        50.0,
        "beanverdict-test",
        &server.uri(),
    )
    .unwrap();
    let err = client.search("latte", &AUSTIN).await.unwrap_err();
    assert!(matches!(err, PlacesError::MissingCredentials { .. }));
}
