use anyhow::Context;
use axum::http::StatusCode;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

pub mod config;
pub mod controllers;
pub mod error;
pub mod home;
pub mod repository;
pub mod routes;

pub use config::{is_memory_url, Config};
pub use error::RepoError;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Deadline applicata a ogni chiamata del repository.
    pub db_timeout: Duration,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            db_timeout: config.db_timeout,
        }
    }
}

/// Opzioni del pool derivate dalla configurazione.
/// Un database in memoria sparisce quando si chiude l'ultima connessione: per quegli URL
/// il pool tiene sempre aperta almeno una connessione e non la ricicla mai.
pub fn pool_options(db_url: &str, config: &Config) -> SqlitePoolOptions {
    let opts = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.db_timeout);
    if is_memory_url(db_url) {
        opts.min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        opts
    }
}

// Crea il pool una sola volta all'avvio; ogni richiesta prende una connessione e la restituisce.
pub async fn connect_pool(db_url: &str, config: &Config) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("parse sqlite url {}", db_url))?
        .create_if_missing(true);
    let pool = pool_options(db_url, config)
        .connect_with(opts)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Crea la tabella users se non esiste. Non è una gestione delle migrazioni.
pub async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL,
            email TEXT NOT NULL
        );"#,
    )
    .execute(pool)
    .await
    .context("create users table")?;
    Ok(())
}

/// Controlla lo stato di salute del database tentando di acquisire una connessione dal pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
