//! The local catalog seam: a trait over the reviews database plus the query
//! that turns raw rows into search candidates.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use beanverdict_core::{round_one_decimal, Coordinates, DrinkCandidate, ShopCandidate, ShopSource};
use beanverdict_db::{
    DbError, DrinkMatchRow, ReviewAggregateRow, ShopRow, MAX_POPULARITY_BATCH,
};
use sqlx::PgPool;

/// Read access to the local shops/drinks/reviews store.
///
/// `needle` arguments are already trimmed and lowercased.
pub trait CatalogStore: Send + Sync {
    fn find_shops(&self, needle: &str) -> impl Future<Output = Result<Vec<ShopRow>, DbError>> + Send;

    fn find_drinks(
        &self,
        needle: &str,
    ) -> impl Future<Output = Result<Vec<DrinkMatchRow>, DbError>> + Send;

    fn shop_review_stats(
        &self,
        shop_ids: &[i64],
    ) -> impl Future<Output = Result<Vec<ReviewAggregateRow>, DbError>> + Send;

    fn drink_review_stats(
        &self,
        drink_ids: &[i64],
    ) -> impl Future<Output = Result<Vec<ReviewAggregateRow>, DbError>> + Send;

    /// Best-effort popularity bump for matched drinks.
    ///
    /// Must return immediately and never fail the caller; lost updates are acceptable.
    fn record_search_hits(&self, drink_ids: &[i64]);
}

/// Postgres-backed [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl CatalogStore for PgCatalog {
    async fn find_shops(&self, needle: &str) -> Result<Vec<ShopRow>, DbError> {
        Ok(beanverdict_db::find_shops_by_name_or_city(&self.pool, needle).await?)
    }

    async fn find_drinks(&self, needle: &str) -> Result<Vec<DrinkMatchRow>, DbError> {
        Ok(beanverdict_db::find_drinks_by_type_or_name(&self.pool, needle).await?)
    }

    async fn shop_review_stats(&self, shop_ids: &[i64]) -> Result<Vec<ReviewAggregateRow>, DbError> {
        Ok(beanverdict_db::aggregate_shop_reviews(&self.pool, shop_ids).await?)
    }

    async fn drink_review_stats(
        &self,
        drink_ids: &[i64],
    ) -> Result<Vec<ReviewAggregateRow>, DbError> {
        Ok(beanverdict_db::aggregate_drink_reviews(&self.pool, drink_ids).await?)
    }

    fn record_search_hits(&self, drink_ids: &[i64]) {
        if drink_ids.is_empty() {
            return;
        }
        let pool = self.pool.clone();
        let ids = drink_ids[..drink_ids.len().min(MAX_POPULARITY_BATCH)].to_vec();
        tokio::spawn(async move {
            if let Err(e) = beanverdict_db::increment_search_popularity(&pool, &ids).await {
                tracing::debug!(error = %e, count = ids.len(), "search popularity update skipped");
            }
        });
    }
}

/// Local shop and drink candidates for one query, without distances.
#[derive(Debug, Clone, Default)]
pub struct LocalMatches {
    pub shops: Vec<ShopCandidate>,
    pub drinks: Vec<DrinkCandidate>,
}

impl LocalMatches {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shops.is_empty() && self.drinks.is_empty()
    }
}

fn stats_by_id(rows: Vec<ReviewAggregateRow>) -> HashMap<i64, (i64, Option<f64>)> {
    rows.into_iter()
        .map(|r| (r.id, (r.review_count, r.avg_rating.map(round_one_decimal))))
        .collect()
}

/// Run the local shop and drink matches for `needle` and attach review aggregates.
///
/// Matched drink ids are handed to [`CatalogStore::record_search_hits`].
///
/// # Errors
///
/// Returns [`DbError`] if any catalog query fails.
pub async fn query_local_catalog<C: CatalogStore>(
    store: &C,
    needle: &str,
) -> Result<LocalMatches, DbError> {
    let (shop_rows, drink_rows) = tokio::try_join!(store.find_shops(needle), store.find_drinks(needle))?;

    let shop_ids: Vec<i64> = shop_rows.iter().map(|s| s.id).collect();
    let mut seen = HashSet::new();
    let drink_ids: Vec<i64> = drink_rows
        .iter()
        .map(|d| d.id)
        .filter(|id| seen.insert(*id))
        .collect();

    store.record_search_hits(&drink_ids);

    let (shop_stats, drink_stats) = tokio::try_join!(
        store.shop_review_stats(&shop_ids),
        store.drink_review_stats(&drink_ids)
    )?;
    let shop_stats = stats_by_id(shop_stats);
    let drink_stats = stats_by_id(drink_stats);

    let shops = shop_rows
        .into_iter()
        .map(|row| {
            let (review_count, avg_rating) = shop_stats.get(&row.id).copied().unwrap_or((0, None));
            ShopCandidate {
                id: row.id.to_string(),
                name: row.name,
                address: row.address,
                city: row.city,
                coordinates: Coordinates::from_parts(row.lat, row.lng),
                avg_rating,
                review_count,
                distance_km: None,
                distance_miles: None,
                source: ShopSource::Local,
            }
        })
        .collect();

    let drinks = drink_rows
        .into_iter()
        .map(|row| {
            let (review_count, avg_rating) = drink_stats.get(&row.id).copied().unwrap_or((0, None));
            DrinkCandidate {
                id: row.id,
                drink_type: row.drink_type,
                display_name: row.display_name,
                shop_id: row.shop_id,
                shop_name: row.shop_name,
                shop_address: row.shop_address,
                shop_coordinates: Coordinates::from_parts(row.shop_lat, row.shop_lng),
                avg_rating,
                review_count,
                distance_km: None,
                distance_miles: None,
            }
        })
        .collect();

    Ok(LocalMatches { shops, drinks })
}
