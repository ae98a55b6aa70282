//! The local shop page. Each drink carries its own rating and the shop rating
//! pools every review on the menu.

use std::cmp::Ordering;

use beanverdict_core::{round_one_decimal, Coordinates};
use beanverdict_db::{DbError, ShopDrinkRow, ShopReviewRow, ShopRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// How many reviews the shop page shows.
pub const RECENT_REVIEW_LIMIT: i64 = 50;

/// Menu items that lead the list, in this order. Everything else follows alphabetically.
const MENU_ORDER: [&str; 15] = [
    "latte",
    "cappuccino",
    "espresso",
    "americano",
    "cold brew",
    "mocha",
    "flat white",
    "cortado",
    "drip coffee",
    "oat milk latte",
    "chai latte",
    "matcha latte",
    "macchiato",
    "nitro cold brew",
    "pour over",
];

const SEASONAL_WORDS: [&str; 5] = ["peppermint", "pumpkin", "gingerbread", "eggnog", "holiday"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Mean of every review across the menu, one decimal place.
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDrink {
    pub drink_id: i64,
    pub display_name: String,
    pub drink_type: String,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
    pub is_seasonal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopReview {
    pub id: i64,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub drink_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopDetail {
    pub shop: ShopSummary,
    pub drinks: Vec<ShopDrink>,
    pub reviews: Vec<ShopReview>,
}

/// Load the page for `shop_id`, or `None` when no such shop exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any of the underlying queries fail.
pub async fn load_shop_detail(pool: &PgPool, shop_id: i64) -> Result<Option<ShopDetail>, DbError> {
    let Some(shop) = beanverdict_db::get_shop_by_id(pool, shop_id).await? else {
        return Ok(None);
    };
    let (drinks, reviews) = tokio::try_join!(
        beanverdict_db::list_shop_drinks(pool, shop_id),
        beanverdict_db::list_recent_shop_reviews(pool, shop_id, RECENT_REVIEW_LIMIT),
    )?;
    Ok(Some(build_shop_detail(shop, drinks, reviews)))
}

#[must_use]
pub fn build_shop_detail(
    shop: ShopRow,
    drinks: Vec<ShopDrinkRow>,
    reviews: Vec<ShopReviewRow>,
) -> ShopDetail {
    let (avg_rating, review_count) = overall_rating(&drinks);

    let mut menu: Vec<ShopDrink> = drinks
        .into_iter()
        .map(|d| ShopDrink {
            is_seasonal: is_seasonal(&d.display_name),
            drink_id: d.id,
            display_name: d.display_name,
            drink_type: d.drink_type,
            avg_rating: d.avg_rating.map(round_one_decimal),
            review_count: d.review_count,
        })
        .collect();
    sort_menu(&mut menu);

    ShopDetail {
        shop: ShopSummary {
            id: shop.id,
            name: shop.name,
            address: shop.address,
            city: shop.city,
            coordinates: Coordinates::from_parts(shop.lat, shop.lng),
            avg_rating,
            review_count,
        },
        drinks: menu,
        reviews: reviews
            .into_iter()
            .map(|r| ShopReview {
                id: r.id,
                rating: r.rating,
                comment: r.comment,
                created_at: r.created_at,
                drink_name: r.drink_name,
            })
            .collect(),
    }
}

/// Review-weighted mean of the per-drink means, and the total review count.
#[allow(clippy::cast_precision_loss)]
fn overall_rating(drinks: &[ShopDrinkRow]) -> (Option<f64>, i64) {
    let total: i64 = drinks.iter().map(|d| d.review_count).sum();
    if total == 0 {
        return (None, 0);
    }
    let weighted: f64 = drinks
        .iter()
        .map(|d| d.avg_rating.unwrap_or(0.0) * d.review_count as f64)
        .sum();
    (Some(round_one_decimal(weighted / total as f64)), total)
}

/// True when `name` contains a holiday word as a whole word, ignoring case.
#[must_use]
pub fn is_seasonal(name: &str) -> bool {
    name.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| SEASONAL_WORDS.iter().any(|s| word.eq_ignore_ascii_case(s)))
}

fn menu_label(drink: &ShopDrink) -> &str {
    if drink.display_name.is_empty() {
        &drink.drink_type
    } else {
        &drink.display_name
    }
}

fn menu_rank(label: &str) -> Option<usize> {
    let label = label.to_lowercase();
    MENU_ORDER.iter().position(|known| *known == label)
}

/// Staples first in [`MENU_ORDER`], then the rest alphabetically.
pub fn sort_menu(menu: &mut [ShopDrink]) {
    menu.sort_by(|a, b| {
        let (la, lb) = (menu_label(a), menu_label(b));
        match (menu_rank(la), menu_rank(lb)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => la
                .to_lowercase()
                .cmp(&lb.to_lowercase())
                .then_with(|| la.cmp(lb)),
        }
    });
}
