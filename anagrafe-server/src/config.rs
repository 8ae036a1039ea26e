use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DATABASE: &str = "anagrafe.db";
const DEFAULT_BIND: &str = "127.0.0.1:8090";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Configurazione del processo, letta una sola volta all'avvio.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Numero massimo di connessioni nel pool.
    pub max_connections: u32,
    /// Deadline per l'acquisizione di una connessione e per ogni query.
    pub db_timeout: Duration,
}

impl Config {
    /// Legge DATABASE_URL, BIND_ADDR, DB_MAX_CONNECTIONS e DB_TIMEOUT_MS dall'ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Come `from_env`, ma con una funzione di lookup arbitraria (usata nei test).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_db = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let database_url = build_sqlite_url(&raw_db).context("build sqlite DATABASE_URL")?;

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND.to_string());
        // converte la stringa bind in un SocketAddr (host + porta)
        let bind_addr: SocketAddr = bind
            .parse()
            .with_context(|| format!("parse BIND_ADDR {:?}", bind))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("parse DB_MAX_CONNECTIONS {:?}", v))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        let timeout_ms = match lookup("DB_TIMEOUT_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("parse DB_TIMEOUT_MS {:?}", v))?,
            None => DEFAULT_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            bail!("DB_TIMEOUT_MS must be greater than 0");
        }

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            db_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite://{}", s))
}

/// Normalizza il valore di DATABASE_URL in un URL SQLite.
/// `sqlite::memory:` passa invariato, tutto il resto è trattato come percorso di file.
/// I parametri dopo `?` (es. `mode=rwc`) non fanno parte del percorso e vengono riattaccati all'URL.
pub fn build_sqlite_url(raw: &str) -> anyhow::Result<String> {
    let (location, query) = match raw.split_once('?') {
        Some((loc, q)) => (loc, Some(q)),
        None => (raw, None),
    };
    if location == "sqlite::memory:" {
        return Ok(raw.to_string());
    }
    // Rimuovi il prefisso "sqlite://" se presente, per ottenere il percorso del file.
    let path_part = if location.starts_with("sqlite:") {
        let rest = location.trim_start_matches("sqlite:");
        let stripped = rest.trim_start_matches("//");
        // "sqlite:///abs/path" -> "/abs/path"
        if rest.starts_with("///") {
            format!("/{}", stripped.trim_start_matches('/'))
        } else {
            stripped.to_string()
        }
    } else {
        location.to_string()
    };
    if path_part.is_empty() {
        bail!("DATABASE_URL does not contain a file path");
    }
    let url = sqlite_url_for_path(&PathBuf::from(path_part))?;
    Ok(match query {
        Some(q) if !q.is_empty() => format!("{}?{}", url, q),
        _ => url,
    })
}

/// Vero se l'URL indica un database SQLite in memoria, che vive solo finché resta aperta una connessione.
pub fn is_memory_url(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}
