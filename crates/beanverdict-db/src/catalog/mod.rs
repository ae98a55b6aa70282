//! Database operations for the `shops`, `drinks`, and `drink_reviews` tables.

mod read;
mod types;
mod write;

pub use read::{
    aggregate_drink_reviews, aggregate_shop_reviews, find_drinks_by_type_or_name,
    find_shops_by_name_or_city, get_shop_by_id, list_popular_drinks, list_recent_shop_reviews,
    list_shop_drinks, suggest_drink_names,
};
pub use types::{DrinkMatchRow, ReviewAggregateRow, ShopDrinkRow, ShopReviewRow, ShopRow};
pub use write::{increment_search_popularity, MAX_POPULARITY_BATCH};
