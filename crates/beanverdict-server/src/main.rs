mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use beanverdict_core::{Environment, SearchConfig};
use beanverdict_search::{PgCatalog, SearchService};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = beanverdict_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = beanverdict_db::PoolConfig::from_app_config(&config);
    let pool = beanverdict_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = beanverdict_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations complete");

    if config.env == Environment::Development {
        let seed = beanverdict_core::load_seed_file(&config.seed_path)?;
        if let Some(summary) = beanverdict_db::seed_if_empty(&pool, &seed).await? {
            tracing::info!(
                shops = summary.shops,
                drinks = summary.drinks,
                reviews = summary.reviews,
                "seeded empty development catalog"
            );
        }
    }

    let search_config = SearchConfig::from_app_config(&config);
    let search = SearchService::from_config(PgCatalog::new(pool.clone()), &search_config)?;
    let app = build_app(AppState {
        pool,
        search: Arc::new(search),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
