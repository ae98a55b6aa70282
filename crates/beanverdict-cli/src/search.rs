//! Handlers for the subcommands that read search data.

use beanverdict_core::{AppConfig, Coordinates, SearchConfig};
use beanverdict_search::{PgCatalog, SearchRequest, SearchService};
use sqlx::PgPool;

fn build_service(pool: PgPool, config: &AppConfig) -> anyhow::Result<SearchService<PgCatalog>> {
    let search_config = SearchConfig::from_app_config(config);
    Ok(SearchService::from_config(PgCatalog::new(pool), &search_config)?)
}

pub(crate) async fn run_search(
    pool: PgPool,
    config: &AppConfig,
    query: &str,
    coordinates: Option<(f64, f64)>,
    location: Option<String>,
) -> anyhow::Result<()> {
    let service = build_service(pool, config)?;
    let request = SearchRequest::new(query)
        .with_coordinates(coordinates.map(|(lat, lng)| Coordinates::new(lat, lng)))
        .with_location(location);

    let result = service.search(&request).await?;
    tracing::info!(
        shops = result.shops.len(),
        drinks = result.drinks.len(),
        "search finished"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) async fn run_place(pool: PgPool, config: &AppConfig, place_id: &str) -> anyhow::Result<()> {
    let service = build_service(pool, config)?;
    match service.place_details(place_id).await {
        Some(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
        None => anyhow::bail!("no details available for place {place_id}"),
    }
    Ok(())
}

pub(crate) async fn run_shop(pool: &PgPool, shop_id: i64) -> anyhow::Result<()> {
    match beanverdict_search::load_shop_detail(pool, shop_id).await? {
        Some(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
        None => anyhow::bail!("shop {shop_id} not found"),
    }
    Ok(())
}
