use chrono::{DateTime, Utc};

/// A row from the `shops` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A drink joined with the identity and coordinates of the shop serving it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrinkMatchRow {
    pub id: i64,
    pub drink_type: String,
    pub display_name: String,
    pub shop_id: i64,
    pub shop_name: String,
    pub shop_address: Option<String>,
    pub shop_lat: Option<f64>,
    pub shop_lng: Option<f64>,
}

/// Review count and unrounded mean rating for one shop or drink.
///
/// `avg_rating` is `None` when `review_count` is zero.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReviewAggregateRow {
    pub id: i64,
    pub review_count: i64,
    pub avg_rating: Option<f64>,
}

/// One drink on a shop's menu with its review summary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopDrinkRow {
    pub id: i64,
    pub drink_type: String,
    pub display_name: String,
    pub review_count: i64,
    pub avg_rating: Option<f64>,
}

/// A review left on one of a shop's drinks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopReviewRow {
    pub id: i64,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub drink_name: String,
}
