//! Postgres storage for the local shops, drinks, and reviews catalog.

pub mod catalog;
pub mod pool;
pub mod seed;

use thiserror::Error;

pub use catalog::{
    aggregate_drink_reviews, aggregate_shop_reviews, find_drinks_by_type_or_name,
    find_shops_by_name_or_city, get_shop_by_id, increment_search_popularity,
    list_popular_drinks, list_recent_shop_reviews, list_shop_drinks, suggest_drink_names,
    DrinkMatchRow, ReviewAggregateRow, ShopDrinkRow, ShopReviewRow, ShopRow,
    MAX_POPULARITY_BATCH,
};
pub use pool::{
    connect_pool, connect_pool_from_env, health_check, ping, run_migrations, PoolConfig,
};
pub use seed::{seed_catalog, seed_if_empty, SeedSummary};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}
