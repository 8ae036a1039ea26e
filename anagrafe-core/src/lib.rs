//! anagrafe-core: tipi condivisi tra server e client (modello User e DTO HTTP).
//! Niente I/O: il mapping verso il database vive nel crate server.

pub mod models;
pub mod protocol;

// Re-export utili per ridurre i percorsi nel crate server
pub use models::user::User;
pub use protocol::http::UserPayload;
