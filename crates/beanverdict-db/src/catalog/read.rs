//! Read operations for the local coffee catalog.

use sqlx::PgPool;

use super::types::{DrinkMatchRow, ReviewAggregateRow, ShopDrinkRow, ShopReviewRow, ShopRow};

/// List shops whose name or city contains `needle`, case-insensitively.
///
/// `needle` is expected to already be trimmed and lowercased. Matching is a
/// plain substring test; no tokenization is applied. Ordered by `id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_shops_by_name_or_city(
    pool: &PgPool,
    needle: &str,
) -> Result<Vec<ShopRow>, sqlx::Error> {
    sqlx::query_as::<_, ShopRow>(
        "SELECT id, name, address, city, lat, lng, created_at \
         FROM shops \
         WHERE strpos(lower(name), $1) > 0 \
            OR strpos(lower(COALESCE(city, '')), $1) > 0 \
         ORDER BY id",
    )
    .bind(needle)
    .fetch_all(pool)
    .await
}

/// Fetch a single shop by primary key.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_shop_by_id(pool: &PgPool, shop_id: i64) -> Result<Option<ShopRow>, sqlx::Error> {
    sqlx::query_as::<_, ShopRow>(
        "SELECT id, name, address, city, lat, lng, created_at FROM shops WHERE id = $1",
    )
    .bind(shop_id)
    .fetch_optional(pool)
    .await
}

/// List drinks whose type or display name contains `needle`, joined with the
/// owning shop's identity and coordinates.
///
/// Ordered by drink `id` so that later ranking ties are deterministic.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_drinks_by_type_or_name(
    pool: &PgPool,
    needle: &str,
) -> Result<Vec<DrinkMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, DrinkMatchRow>(
        "SELECT d.id, d.drink_type, d.display_name, \
                s.id AS shop_id, s.name AS shop_name, s.address AS shop_address, \
                s.lat AS shop_lat, s.lng AS shop_lng \
         FROM drinks d \
         JOIN shops s ON s.id = d.shop_id \
         WHERE strpos(lower(d.drink_type), $1) > 0 \
            OR strpos(lower(d.display_name), $1) > 0 \
         ORDER BY d.id",
    )
    .bind(needle)
    .fetch_all(pool)
    .await
}

/// Review count and mean rating per shop, pooled across every drink the shop serves.
///
/// One row per requested id that exists; shops without reviews report a
/// count of zero and no mean.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn aggregate_shop_reviews(
    pool: &PgPool,
    shop_ids: &[i64],
) -> Result<Vec<ReviewAggregateRow>, sqlx::Error> {
    if shop_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ReviewAggregateRow>(
        "SELECT s.id, \
                COUNT(r.id) AS review_count, \
                AVG(r.rating)::float8 AS avg_rating \
         FROM shops s \
         LEFT JOIN drinks d ON d.shop_id = s.id \
         LEFT JOIN drink_reviews r ON r.drink_id = d.id \
         WHERE s.id = ANY($1::bigint[]) \
         GROUP BY s.id",
    )
    .bind(shop_ids)
    .fetch_all(pool)
    .await
}

/// Review count and mean rating per drink.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn aggregate_drink_reviews(
    pool: &PgPool,
    drink_ids: &[i64],
) -> Result<Vec<ReviewAggregateRow>, sqlx::Error> {
    if drink_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ReviewAggregateRow>(
        "SELECT d.id, \
                COUNT(r.id) AS review_count, \
                AVG(r.rating)::float8 AS avg_rating \
         FROM drinks d \
         LEFT JOIN drink_reviews r ON r.drink_id = d.id \
         WHERE d.id = ANY($1::bigint[]) \
         GROUP BY d.id",
    )
    .bind(drink_ids)
    .fetch_all(pool)
    .await
}

/// Distinct drink display names ranked by how often they have been searched.
///
/// Ties fall back to total review count, then alphabetical order. When the
/// ranked query fails (for example, the `search_count` column has not been
/// migrated yet) the names are returned alphabetically instead.
///
/// # Errors
///
/// Returns [`sqlx::Error`] only if the alphabetical fallback also fails.
pub async fn list_popular_drinks(pool: &PgPool, limit: i64) -> Result<Vec<String>, sqlx::Error> {
    let ranked = sqlx::query_scalar::<_, String>(
        "SELECT d.display_name \
         FROM drinks d \
         LEFT JOIN drink_reviews r ON r.drink_id = d.id \
         GROUP BY d.display_name \
         ORDER BY COALESCE(SUM(d.search_count), 0) DESC, COUNT(r.id) DESC, d.display_name \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await;

    match ranked {
        Ok(names) => Ok(names),
        Err(e) => {
            tracing::warn!(error = %e, "popular drinks ranking failed; falling back to alphabetical");
            sqlx::query_scalar::<_, String>(
                "SELECT display_name FROM drinks \
                 GROUP BY display_name \
                 ORDER BY display_name \
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}

/// Every drink a shop serves, with per-drink review count and mean rating.
///
/// Unordered; menu ordering is a presentation concern.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_shop_drinks(pool: &PgPool, shop_id: i64) -> Result<Vec<ShopDrinkRow>, sqlx::Error> {
    sqlx::query_as::<_, ShopDrinkRow>(
        "SELECT d.id, d.drink_type, d.display_name, \
                COUNT(r.id) AS review_count, \
                AVG(r.rating)::float8 AS avg_rating \
         FROM drinks d \
         LEFT JOIN drink_reviews r ON r.drink_id = d.id \
         WHERE d.shop_id = $1 \
         GROUP BY d.id",
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await
}

/// The newest `limit` reviews across all of a shop's drinks.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_recent_shop_reviews(
    pool: &PgPool,
    shop_id: i64,
    limit: i64,
) -> Result<Vec<ShopReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ShopReviewRow>(
        "SELECT r.id, r.rating, r.comment, r.created_at, d.display_name AS drink_name \
         FROM drink_reviews r \
         JOIN drinks d ON d.id = r.drink_id \
         WHERE d.shop_id = $1 \
         ORDER BY r.created_at DESC, r.id DESC \
         LIMIT $2",
    )
    .bind(shop_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Distinct drink display names whose type or name contains `needle`, alphabetically.
///
/// `needle` is expected to already be trimmed and lowercased.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn suggest_drink_names(
    pool: &PgPool,
    needle: &str,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT display_name \
         FROM drinks \
         WHERE strpos(lower(drink_type), $1) > 0 \
            OR strpos(lower(display_name), $1) > 0 \
         ORDER BY display_name \
         LIMIT $2",
    )
    .bind(needle)
    .bind(limit)
    .fetch_all(pool)
    .await
}
