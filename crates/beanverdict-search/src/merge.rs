//! Combining local and provider shop lists into one ordered, de-duplicated list.

use std::collections::HashSet;

use beanverdict_core::{Coordinates, DrinkCandidate, ShopCandidate};

const SUGGESTED_SHOPS: usize = 4;
const SUGGESTED_DRINKS: usize = 6;
pub const MAX_SUGGESTIONS: usize = 10;

/// Shop lists gathered for one search, by source.
#[derive(Debug, Default)]
pub struct ShopSources {
    pub local: Vec<ShopCandidate>,
    pub primary: Vec<ShopCandidate>,
    pub budget: Vec<ShopCandidate>,
    pub community: Vec<ShopCandidate>,
}

/// Trim, lowercase, and collapse internal whitespace.
#[must_use]
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn dedup_key(shop: &ShopCandidate) -> (String, String) {
    (
        normalize_key(&shop.name),
        normalize_key(shop.address.as_deref().unwrap_or("")),
    )
}

/// Drop later shops whose normalized (name, address) was already seen.
pub fn dedup_shops(shops: &mut Vec<ShopCandidate>) {
    let mut seen = HashSet::new();
    shops.retain(|shop| seen.insert(dedup_key(shop)));
}

/// Stable sort by distance ascending; shops without a distance go last.
pub fn sort_by_distance(shops: &mut [ShopCandidate]) {
    shops.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Merge shop lists in precedence order: local, then one commercial provider,
/// then the community map.
///
/// The budget provider's results replace the primary provider's whenever the
/// budget list is non-empty. Every shop is annotated with its distance from
/// `origin`; with an origin the list is ordered nearest first, without one it
/// keeps merge order.
#[must_use]
pub fn merge_shops(sources: ShopSources, origin: Option<&Coordinates>) -> Vec<ShopCandidate> {
    let ShopSources {
        local,
        primary,
        budget,
        community,
    } = sources;
    let commercial = if budget.is_empty() { primary } else { budget };

    let mut shops: Vec<ShopCandidate> = local
        .into_iter()
        .chain(commercial)
        .chain(community)
        .collect();
    for shop in &mut shops {
        shop.annotate_distance(origin);
    }
    dedup_shops(&mut shops);
    if origin.is_some() {
        sort_by_distance(&mut shops);
    }
    shops
}

/// Top shop names followed by top drink names, de-duplicated and capped.
#[must_use]
pub fn build_suggestions(shops: &[ShopCandidate], drinks: &[DrinkCandidate]) -> Vec<String> {
    let mut seen = HashSet::new();
    shops
        .iter()
        .take(SUGGESTED_SHOPS)
        .map(|s| s.name.as_str())
        .chain(drinks.iter().take(SUGGESTED_DRINKS).map(|d| d.display_name.as_str()))
        .filter(|name| seen.insert(*name))
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}
