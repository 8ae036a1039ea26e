use serde::{Deserialize, Serialize};

/*
    http dto for http requests
*/
// Body di POST /user e PUT /user/{id}. Entrambi i campi sono obbligatori.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}
