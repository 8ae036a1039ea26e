use axum::response::Html;

// Pagina statica compilata nel binario
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Handler per GET /: form HTML che invia l'utente come JSON a POST /user.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
