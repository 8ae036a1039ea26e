use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ri-utilizziamo le funzioni e strutture definite in lib.rs
use anagrafe_server::{connect_pool, ensure_schema, routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anagrafe_server=info")),
        )
        .init();

    // Configurazione letta una sola volta: un errore qui termina il processo
    let config = Config::from_env().context("load configuration")?;
    tracing::info!(database_url = %config.database_url, "using database");

    // Pool condiviso da tutte le richieste
    let pool = connect_pool(&config.database_url, &config)
        .await
        .context("connect to sqlite")?;
    ensure_schema(&pool).await.context("ensure schema")?;

    let state = Arc::new(AppState::new(pool.clone(), &config));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("bind tcp listener")?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        // senza segnale restiamo in ascolto indefinitamente
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
