//! Unified coffee shop and drink search.
//!
//! [`SearchService`] merges the local reviews catalog with external place
//! providers into one ranked [`beanverdict_core::SearchResult`]. Only a local
//! catalog failure surfaces as an error. [`load_shop_detail`] builds the
//! local shop page.

pub mod aggregator;
pub mod catalog;
pub mod location;
pub mod merge;
pub mod relevance;
pub mod shop_detail;

use beanverdict_db::DbError;
use thiserror::Error;

pub use aggregator::{normalize_query, SearchRequest, SearchService, MIN_QUERY_CHARS};
pub use catalog::{query_local_catalog, CatalogStore, LocalMatches, PgCatalog};
pub use location::LocationResolver;
pub use merge::{build_suggestions, merge_shops, normalize_key, ShopSources, MAX_SUGGESTIONS};
pub use relevance::{drink_score, rank_drinks};
pub use shop_detail::{
    build_shop_detail, is_seasonal, load_shop_detail, sort_menu, ShopDetail, ShopDrink,
    ShopReview, ShopSummary, RECENT_REVIEW_LIMIT,
};

#[derive(Debug, Error)]
pub enum SearchError {
    /// The local catalog could not be queried; search cannot proceed without it.
    #[error("local catalog query failed: {0}")]
    Catalog(#[from] DbError),
}
