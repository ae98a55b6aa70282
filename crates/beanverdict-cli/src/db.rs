//! `db` subcommand handlers.

use beanverdict_core::AppConfig;
use sqlx::PgPool;

pub(crate) async fn run_ping(pool: &PgPool) -> anyhow::Result<()> {
    beanverdict_db::ping(pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_migrate(pool: &PgPool) -> anyhow::Result<()> {
    let applied = beanverdict_db::run_migrations(pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Wipe and reseed the catalog from the configured seed file.
pub(crate) async fn run_seed(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let seed = beanverdict_core::load_seed_file(&config.seed_path)?;
    let summary = beanverdict_db::seed_catalog(pool, &seed).await?;
    println!(
        "seeded {} shops, {} drinks, {} reviews from {}",
        summary.shops,
        summary.drinks,
        summary.reviews,
        config.seed_path.display()
    );
    Ok(())
}
