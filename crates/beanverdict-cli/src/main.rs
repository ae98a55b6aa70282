mod db;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "beanverdict")]
#[command(about = "Coffee shop and drink search command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a unified search and print the result as JSON
    Search {
        /// Drink or shop text to search for
        query: String,
        /// Latitude of the search origin
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of the search origin
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Free-text location to geocode when no coordinates are given
        #[arg(long)]
        location: Option<String>,
    },
    /// Fetch provider details for a place id (e.g. `osm-123`, `fsq-abc`)
    Place {
        place_id: String,
    },
    /// Print a local shop's menu and recent reviews as JSON
    Shop {
        shop_id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Replace the catalog with freshly generated seed data
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("beanverdict: run with --help for available commands");
        return Ok(());
    };

    let config = beanverdict_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = beanverdict_db::PoolConfig::from_app_config(&config);
    let pool = beanverdict_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_ping(&pool).await,
            DbCommands::Migrate => db::run_migrate(&pool).await,
            DbCommands::Seed => db::run_seed(&pool, &config).await,
        },
        Commands::Search {
            query,
            lat,
            lng,
            location,
        } => search::run_search(pool, &config, &query, lat.zip(lng), location).await,
        Commands::Place { place_id } => search::run_place(pool, &config, &place_id).await,
        Commands::Shop { shop_id } => search::run_shop(&pool, shop_id).await,
    }
}

#[cfg(test)]
mod tests;
