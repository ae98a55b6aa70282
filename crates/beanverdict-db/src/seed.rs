use beanverdict_core::{SeedDrink, SeedFile, SeedShop};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use sqlx::PgPool;

use crate::DbError;

/// Fewest drinks any seeded shop carries (capped by the menu size).
const MIN_DRINKS_PER_SHOP: usize = 8;
const REVIEWS_PER_DRINK: std::ops::RangeInclusive<usize> = 2..=12;
const SEED_RATINGS: std::ops::RangeInclusive<i16> = 3..=5;

/// Row counts written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub shops: usize,
    pub drinks: usize,
    pub reviews: usize,
}

#[derive(Debug)]
struct PlannedDrink<'a> {
    drink: &'a SeedDrink,
    reviews: Vec<(i16, Option<&'a str>)>,
}

#[derive(Debug)]
struct PlannedShop<'a> {
    shop: &'a SeedShop,
    drinks: Vec<PlannedDrink<'a>>,
}

/// Decide every menu and review up front so no RNG is held across an await.
fn plan_seed<'a, R: Rng>(seed: &'a SeedFile, rng: &mut R) -> Vec<PlannedShop<'a>> {
    let menu_size = seed.drinks.len();
    let min_drinks = MIN_DRINKS_PER_SHOP.min(menu_size);
    let mut plan = Vec::with_capacity(seed.shops.len());

    for shop in &seed.shops {
        let count = if menu_size == 0 {
            0
        } else {
            rng.random_range(min_drinks..=menu_size)
        };
        let mut menu: Vec<&SeedDrink> = seed.drinks.iter().collect();
        menu.shuffle(rng);

        let mut drinks = Vec::with_capacity(count);
        for drink in menu.into_iter().take(count) {
            let review_count = rng.random_range(REVIEWS_PER_DRINK);
            let mut reviews = Vec::with_capacity(review_count);
            for _ in 0..review_count {
                let rating = rng.random_range(SEED_RATINGS);
                let comment = seed.comments.choose(rng).and_then(|c| c.as_deref());
                reviews.push((rating, comment));
            }
            drinks.push(PlannedDrink { drink, reviews });
        }

        plan.push(PlannedShop { shop, drinks });
    }

    plan
}

/// Replace the catalog with the shops and drink menu from `seed`.
///
/// Existing shops, drinks, and reviews are deleted first. Each shop is given a
/// random subset of the drink menu, and each drink a handful of 3 to 5 star
/// reviews. Everything runs inside a single transaction; if any insert fails
/// the previous catalog is left untouched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, seed: &SeedFile) -> Result<SeedSummary, DbError> {
    let plan = plan_seed(seed, &mut rand::rng());
    let mut summary = SeedSummary::default();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM drink_reviews")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM drinks").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM shops").execute(&mut *tx).await?;

    for planned in &plan {
        let shop = planned.shop;
        let shop_id: i64 = sqlx::query_scalar(
            "INSERT INTO shops (name, address, city, lat, lng) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(&shop.name)
        .bind(&shop.address)
        .bind(&shop.city)
        .bind(shop.lat)
        .bind(shop.lng)
        .fetch_one(&mut *tx)
        .await?;
        summary.shops += 1;

        for planned_drink in &planned.drinks {
            let drink_id: i64 = sqlx::query_scalar(
                "INSERT INTO drinks (shop_id, drink_type, display_name) \
                 VALUES ($1, $2, $3) \
                 RETURNING id",
            )
            .bind(shop_id)
            .bind(&planned_drink.drink.drink_type)
            .bind(&planned_drink.drink.display)
            .fetch_one(&mut *tx)
            .await?;
            summary.drinks += 1;

            for (rating, comment) in &planned_drink.reviews {
                sqlx::query(
                    "INSERT INTO drink_reviews (drink_id, rating, comment) VALUES ($1, $2, $3)",
                )
                .bind(drink_id)
                .bind(*rating)
                .bind(*comment)
                .execute(&mut *tx)
                .await?;
                summary.reviews += 1;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        shops = summary.shops,
        drinks = summary.drinks,
        reviews = summary.reviews,
        "seeded catalog"
    );
    Ok(summary)
}

/// Seed the catalog only when the `shops` table is empty.
///
/// Returns `None` when existing data was found and left alone.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_if_empty(pool: &PgPool, seed: &SeedFile) -> Result<Option<SeedSummary>, DbError> {
    let has_shops: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shops)")
        .fetch_one(pool)
        .await?;
    if has_shops {
        tracing::debug!("catalog already populated; skipping seed");
        return Ok(None);
    }
    seed_catalog(pool, seed).await.map(Some)
}
