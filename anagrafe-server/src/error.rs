use axum::http::StatusCode;
use thiserror::Error;

/// Esito di una operazione del repository che non è andata a buon fine.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Nessuna riga corrisponde all'id richiesto.
    #[error("user not found")]
    NotFound,
    /// La query non si è conclusa entro la deadline configurata.
    #[error("database call timed out")]
    Timeout,
    /// Il pool non ha potuto fornire una connessione.
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("database error: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Unavailable(e)
            }
            other => RepoError::Storage(other),
        }
    }
}

impl RepoError {
    /// Mappa l'errore in (StatusCode, body) come fanno gli handler.
    /// Il dettaglio dell'errore del driver viene loggato, mai restituito al client.
    pub fn into_http(self) -> (StatusCode, String) {
        match self {
            RepoError::NotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            RepoError::Timeout => {
                tracing::error!("database call exceeded deadline");
                (StatusCode::SERVICE_UNAVAILABLE, "database timeout".to_string())
            }
            RepoError::Unavailable(e) => {
                tracing::error!(error = %e, "database unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "database unavailable".to_string())
            }
            RepoError::Storage(e) => {
                tracing::error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database error".to_string())
            }
        }
    }
}
