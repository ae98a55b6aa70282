//! Write operations for the drink popularity counter.

use sqlx::PgPool;

/// Upper bound on ids bumped per search.
pub const MAX_POPULARITY_BATCH: usize = 50;

/// Bump `search_count` by one for the given drink ids.
///
/// Only the first [`MAX_POPULARITY_BATCH`] ids are touched. Duplicate ids are
/// counted once. Returns the number of rows updated.
///
/// Callers treat this as best-effort: increments may be lost under contention
/// and a failure here must not fail a search.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails, including when the
/// `search_count` column is absent on an older schema.
pub async fn increment_search_popularity(pool: &PgPool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    let batch = &ids[..ids.len().min(MAX_POPULARITY_BATCH)];
    if batch.is_empty() {
        return Ok(0);
    }

    let rows_affected = sqlx::query(
        "UPDATE drinks \
         SET search_count = COALESCE(search_count, 0) + 1 \
         WHERE id = ANY($1::bigint[])",
    )
    .bind(batch)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected)
}
