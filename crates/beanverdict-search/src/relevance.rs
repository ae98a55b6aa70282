//! Drink ranking.

use beanverdict_core::DrinkCandidate;

const EXACT_MATCH: f64 = 100.0;
const PREFIX_MATCH: f64 = 50.0;
const RATING_WEIGHT: f64 = 10.0;
const REVIEW_WEIGHT: f64 = 5.0;
const DISTANCE_PENALTY_PER_KM: f64 = 2.0;

/// Score a drink against a lowercase, trimmed query. Higher is better.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn drink_score(drink: &DrinkCandidate, query: &str) -> f64 {
    let drink_type = drink.drink_type.to_lowercase();
    let display = drink.display_name.to_lowercase();

    let mut score = if drink_type == query || display == query {
        EXACT_MATCH
    } else if drink_type.starts_with(query) || display.starts_with(query) {
        PREFIX_MATCH
    } else {
        0.0
    };

    if let Some(rating) = drink.avg_rating {
        score += rating * RATING_WEIGHT;
    }
    score += REVIEW_WEIGHT * (drink.review_count.max(0) as f64).ln_1p();
    if let Some(km) = drink.distance_km {
        score -= DISTANCE_PENALTY_PER_KM * km;
    }
    score
}

/// Sort drinks by descending score. Equal scores keep their incoming order.
pub fn rank_drinks(drinks: Vec<DrinkCandidate>, query: &str) -> Vec<DrinkCandidate> {
    let mut scored: Vec<(f64, DrinkCandidate)> = drinks
        .into_iter()
        .map(|d| (drink_score(&d, query), d))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, d)| d).collect()
}
