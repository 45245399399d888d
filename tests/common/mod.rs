#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use sustaintrack::config::{Config, CorsOrigins};
use sustaintrack::db::{ActionStore, MemoryStore, PgStore};

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    /// Set when the server runs against a throwaway PostgreSQL database.
    pub pg: Option<(PgPool, String)>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Create an action, return (body, status).
    pub async fn create_action(&self, body: &Value) -> (Value, StatusCode) {
        self.post("/api/actions/create/", body).await
    }

    /// Create an action that must succeed, return its JSON.
    pub async fn seed(&self, action: &str, date: &str, points: i64) -> Value {
        let (body, status) = self
            .create_action(&json!({ "action": action, "date": date, "points": points }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed failed: {body}");
        body
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// DELETE and return the raw body text with the status.
    pub async fn delete(&self, path: &str) -> (String, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        db_max_connections: 5,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 16 * 1024,
        cors: CorsOrigins::List(vec!["http://localhost:5173".to_string()]),
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app backed by the in-memory store.
pub async fn spawn_app() -> TestApp {
    serve(Arc::new(MemoryStore::new()), None).await
}

/// Spawn a test app against a fresh temporary PostgreSQL database.
/// Returns `None` when `DATABASE_URL` is not set.
pub async fn spawn_pg_app() -> Option<TestApp> {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").ok()?;

    let db_name = format!("sustaintrack_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let store = Arc::new(PgStore::new(pool.clone()));
    Some(serve(store, Some((pool, db_name))).await)
}

async fn serve(store: Arc<dyn ActionStore>, pg: Option<(PgPool, String)>) -> TestApp {
    let app = sustaintrack::build_app(store, &test_config());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        pg,
    }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Drop the temporary database, if any.
pub async fn cleanup(app: TestApp) {
    let Some((pool, db_name)) = app.pg else {
        return;
    };
    pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for cleanup");
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
