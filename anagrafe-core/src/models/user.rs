use serde::{Deserialize, Serialize};

use crate::protocol::http::UserPayload;

/// Utente esposto sul wire: `{"ID": .., "Name": .., "Email": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64, // assegnato dal database
    pub name: String,
    pub email: String,
}

impl User {
    /// Costruisce il record a partire dal body di una richiesta e dall'id assegnato.
    pub fn from_payload(id: i64, payload: UserPayload) -> Self {
        Self {
            id,
            name: payload.name,
            email: payload.email,
        }
    }
}
