//! Operazioni CRUD sulla tabella `users`: ogni funzione esegue esattamente
//! una query parametrizzata. La connessione viene presa dal pool da sqlx e
//! restituita al termine della query, anche in caso di errore.

use anagrafe_core::{User, UserPayload};
use sqlx::{Row, SqlitePool};
use std::future::Future;
use std::time::Duration;

use crate::error::RepoError;

/// Limita la durata di una operazione del repository.
/// Se la deadline scade il future viene droppato e la connessione torna al pool.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, RepoError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(res) => res,
        Err(_) => Err(RepoError::Timeout),
    }
}

/// Inserisce un nuovo utente; l'id è assegnato dal database.
pub async fn create_user(pool: &SqlitePool, payload: UserPayload) -> Result<User, RepoError> {
    let res = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
        .bind(&payload.name)
        .bind(&payload.email)
        .execute(pool)
        .await?;
    Ok(User::from_payload(res.last_insert_rowid(), payload))
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User, RepoError> {
    // fetch_optional: nessuna riga -> None, che diventa NotFound
    let row = sqlx::query("SELECT id, name, email FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(RepoError::NotFound)?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

/// Sovrascrive name ed email. Zero righe toccate -> NotFound.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: &str,
) -> Result<(), RepoError> {
    let res = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
        .bind(name)
        .bind(email)
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(RepoError::NotFound);
    }
    Ok(())
}

/// Elimina la riga con l'id dato. Zero righe toccate -> NotFound.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<(), RepoError> {
    let res = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(RepoError::NotFound);
    }
    Ok(())
}
