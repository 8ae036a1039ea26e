use anagrafe_core::{User, UserPayload};
use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::{header, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::repository::{self, with_deadline};
use crate::AppState;

type HandlerError = (StatusCode, String);

// Converte il segmento di path in un id numerico; input non numerico -> 400.
fn parse_id(raw: &str) -> Result<i64, HandlerError> {
    raw.parse::<i64>().map_err(|_| {
        tracing::warn!(id = raw, "invalid id parameter");
        (StatusCode::BAD_REQUEST, "Invalid 'id' parameter".to_string())
    })
}

// Decodifica il body JSON indipendentemente dal Content-Type; JSON malformato -> 400.
fn decode_payload(body: &[u8]) -> Result<UserPayload, HandlerError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "invalid json body");
        (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    })
}

/// Handler per POST /user
pub async fn create_user(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<User>), HandlerError> {
    let payload = decode_payload(&body)?;

    /* la deadline copre sia l'acquisizione della connessione sia l'INSERT */
    let user = with_deadline(
        state.db_timeout,
        repository::create_user(&state.pool, payload),
    )
    .await
    .map_err(|e| e.into_http())?;

    tracing::info!(id = user.id, "user created");
    let location = format!("/user/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

/// Handler per GET /user/{id}
pub async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, HandlerError> {
    let id = parse_id(&raw_id)?;
    let user = with_deadline(state.db_timeout, repository::get_user(&state.pool, id))
        .await
        .map_err(|e| e.into_http())?;
    Ok(Json(user))
}

/// Handler per PUT /user/{id}
pub async fn update_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, String), HandlerError> {
    let id = parse_id(&raw_id)?;
    let payload = decode_payload(&body)?;

    with_deadline(
        state.db_timeout,
        repository::update_user(&state.pool, id, &payload.name, &payload.email),
    )
    .await
    .map_err(|e| e.into_http())?;

    tracing::info!(id, "user updated");
    Ok((StatusCode::OK, "User updated successfully".to_string()))
}

/// Handler per DELETE /user/{id}
pub async fn delete_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<(StatusCode, String), HandlerError> {
    let id = parse_id(&raw_id)?;
    with_deadline(state.db_timeout, repository::delete_user(&state.pool, id))
        .await
        .map_err(|e| e.into_http())?;

    tracing::info!(id, "user deleted");
    Ok((StatusCode::OK, "User deleted successfully".to_string()))
}
