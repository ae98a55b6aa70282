//! Offline tests for beanverdict-db pool configuration and row types.
//! These tests do not require a live database connection.

use beanverdict_core::{AppConfig, Environment};
use beanverdict_db::{DrinkMatchRow, PoolConfig, ReviewAggregateRow, MAX_POPULARITY_BATCH};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3001),
        log_level: "info".to_string(),
        seed_path: PathBuf::from("./config/seed.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        google_places_api_key: None,
        foursquare_api_key: None,
        enable_community_map: true,
        provider_timeout_ms: 8000,
        search_radius_km: 50.0,
        community_radius_km: 8.0,
        location_timeout_ms: 3000,
        user_agent: "ua".to_string(),
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout, Duration::from_secs(9));
}

/// Compile-time smoke test: confirm that [`DrinkMatchRow`] carries the owning
/// shop's identity alongside the drink. No database required.
#[test]
fn drink_match_row_has_expected_fields() {
    let row = DrinkMatchRow {
        id: 11_i64,
        drink_type: "cold brew".to_string(),
        display_name: "Cold Brew".to_string(),
        shop_id: 3_i64,
        shop_name: "Merit Coffee".to_string(),
        shop_address: Some("1200 S Lamar Blvd".to_string()),
        shop_lat: Some(30.2522),
        shop_lng: None,
    };

    assert_eq!(row.shop_id, 3);
    assert_eq!(row.drink_type, "cold brew");
    assert!(row.shop_lng.is_none());
}

#[test]
fn review_aggregate_row_allows_missing_mean() {
    let row = ReviewAggregateRow {
        id: 1,
        review_count: 0,
        avg_rating: None,
    };
    assert_eq!(row.review_count, 0);
    assert!(row.avg_rating.is_none());
}

#[test]
fn popularity_batch_is_fifty() {
    assert_eq!(MAX_POPULARITY_BATCH, 50);
}
