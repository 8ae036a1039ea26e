use anyhow::Result;
use anagrafe_core::User;
use anagrafe_server::{connect_pool, ensure_schema, routes, AppState, Config};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

// Server di test: router reale su una porta effimera e database su file temporaneo.
struct TestApp {
    base: String,
    client: reqwest::Client,
    _td: TempDir,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

async fn spawn_app() -> Result<TestApp> {
    let td = TempDir::new()?;
    let db = td.path().join("anagrafe.db").to_string_lossy().to_string();
    let config = Config::from_lookup(move |k| match k {
        "DATABASE_URL" => Some(db.clone()),
        "BIND_ADDR" => Some("127.0.0.1:0".to_string()),
        _ => None,
    })?;

    let pool = connect_pool(&config.database_url, &config).await?;
    ensure_schema(&pool).await?;
    let app = routes::router(Arc::new(AppState::new(pool, &config)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    Ok(TestApp {
        base: format!("http://{}", addr),
        client: reqwest::Client::new(),
        _td: td,
    })
}

async fn create(app: &TestApp, name: &str, email: &str) -> Result<User> {
    let resp = app
        .client
        .post(app.url("/user"))
        .json(&json!({ "Name": name, "Email": email }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    Ok(resp.json::<User>().await?)
}

#[tokio::test]
async fn create_then_read_round_trip() -> Result<()> {
    let app = spawn_app().await?;

    let resp = app
        .client
        .post(app.url("/user"))
        .json(&json!({ "Name": "Alice", "Email": "alice@example.com" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let created: User = resp.json().await?;
    assert_eq!(location, Some(format!("/user/{}", created.id)));

    let resp = app.client.get(app.url(&format!("/user/{}", created.id))).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(
        body,
        json!({ "ID": created.id, "Name": "Alice", "Email": "alice@example.com" })
    );
    Ok(())
}

#[tokio::test]
async fn read_missing_user_is_404() -> Result<()> {
    let app = spawn_app().await?;
    let resp = app.client.get(app.url("/user/999999")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_400() -> Result<()> {
    let app = spawn_app().await?;

    let resp = app.client.get(app.url("/user/abc")).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .put(app.url("/user/abc"))
        .json(&json!({ "Name": "x", "Email": "y" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.client.delete(app.url("/user/abc")).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> Result<()> {
    let app = spawn_app().await?;

    let resp = app
        .client
        .post(app.url("/user"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"Name\": \"Alice\",")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // nessuna riga deve essere stata creata
    let resp = app.client.get(app.url("/user/1")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let user = create(&app, "Bob", "bob@example.com").await?;
    let resp = app
        .client
        .put(app.url(&format!("/user/{}", user.id)))
        .body("not json")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_overwrites_fields() -> Result<()> {
    let app = spawn_app().await?;
    let user = create(&app, "Carol", "carol@example.com").await?;

    let resp = app
        .client
        .put(app.url(&format!("/user/{}", user.id)))
        .json(&json!({ "Name": "Caroline", "Email": "caroline@example.com" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await?.contains("updated"));

    let read: User = app
        .client
        .get(app.url(&format!("/user/{}", user.id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(read.id, user.id);
    assert_eq!(read.name, "Caroline");
    assert_eq!(read.email, "caroline@example.com");
    Ok(())
}

#[tokio::test]
async fn update_missing_user_is_404() -> Result<()> {
    let app = spawn_app().await?;
    let resp = app
        .client
        .put(app.url("/user/999999"))
        .json(&json!({ "Name": "Nobody", "Email": "nobody@example.com" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_read_is_404() -> Result<()> {
    let app = spawn_app().await?;
    let user = create(&app, "Dave", "dave@example.com").await?;
    let path = format!("/user/{}", user.id);

    let resp = app.client.delete(app.url(&path)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await?.contains("deleted"));

    let resp = app.client.get(app.url(&path)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // seconda cancellazione: la riga non esiste più
    let resp = app.client.delete(app.url(&path)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn home_page_serves_form() -> Result<()> {
    let app = spawn_app().await?;
    let resp = app.client.get(app.url("/")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let ctype = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(ctype.starts_with("text/html"), "content-type was {}", ctype);
    let html = resp.text().await?;
    assert!(html.contains("postUserForm"));
    assert!(html.contains("fetch('/user'"));
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let app = spawn_app().await?;
    let resp = app.client.get(app.url("/health")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
