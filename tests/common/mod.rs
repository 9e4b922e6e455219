#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Fresh in-memory database with the league schema. A single connection that
/// never expires keeps the database alive for the whole test.
pub async fn test_pool() -> SqlitePool {
    pool_with_schema(SCHEMA).await
}

/// Same as [`test_pool`] but with caller-supplied tables, for schemas looser
/// than the shipped one.
pub async fn pool_with_schema(schema: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::raw_sql(schema)
        .execute(&pool)
        .await
        .expect("Failed to apply schema");

    pool
}

pub async fn test_app() -> Router {
    league_table_api::routes::app(test_pool().await)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("Response body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> TestResponse {
    send_bytes(app, method, uri, body.as_bytes().to_vec()).await
}

pub async fn send_bytes(app: &Router, method: &str, uri: &str, body: Vec<u8>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let body = body.map(|b| b.to_string()).unwrap_or_default();
    send_raw(app, method, uri, &body).await
}

pub async fn create_team(app: &Router, name: &str, position: i64) -> i64 {
    let response = send(
        app,
        "POST",
        "/api/standings",
        Some(json!({ "name": name, "position": position })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()["team"]["id"].as_i64().unwrap()
}

pub async fn create_player(app: &Router, team_id: i64, name: &str, number: i64) -> i64 {
    let response = send(
        app,
        "POST",
        "/api/roster",
        Some(json!({ "team_id": team_id, "name": name, "number": number })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()["player"]["id"].as_i64().unwrap()
}

pub async fn create_match(app: &Router, home: i64, away: i64, match_date: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/api/fixtures",
        Some(json!({ "home_team_id": home, "away_team_id": away, "match_date": match_date })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.json()["match"]["id"].as_i64().unwrap()
}
