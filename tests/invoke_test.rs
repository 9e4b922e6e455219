mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_team, send, test_app};

async fn invoke(app: &axum::Router, service: &str, event: Value) -> Value {
    let response = send(app, "POST", &format!("/invoke/{service}"), Some(event)).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    response.json()
}

fn body_of(envelope: &Value) -> Value {
    serde_json::from_str(envelope["body"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn preflight_envelope_is_uniform_across_services() {
    let app = test_app().await;

    for service in ["standings", "fixtures", "roster"] {
        let envelope = invoke(&app, service, json!({ "httpMethod": "OPTIONS", "body": "{oops" })).await;

        assert_eq!(envelope["statusCode"], 200, "{service}");
        assert_eq!(envelope["body"], "", "{service}");
        assert_eq!(envelope["isBase64Encoded"], false, "{service}");
        let headers = &envelope["headers"];
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Max-Age"], "86400");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET, POST, PUT, DELETE, OPTIONS", "{service}");
        assert!(headers["Access-Control-Allow-Headers"].is_string());
        assert!(headers.get("Content-Type").is_none());
    }
}

#[tokio::test]
async fn unsupported_method_envelope_is_405_everywhere() {
    let app = test_app().await;

    for service in ["standings", "fixtures", "roster"] {
        for method in ["PATCH", "HEAD", "TRACE"] {
            let envelope = invoke(&app, service, json!({ "httpMethod": method })).await;

            assert_eq!(envelope["statusCode"], 405, "{service} {method}");
            assert_eq!(body_of(&envelope), json!({ "error": "Method not allowed" }));
            assert_eq!(envelope["headers"]["Access-Control-Allow-Origin"], "*");
        }
    }
}

#[tokio::test]
async fn create_and_list_through_envelopes() {
    let app = test_app().await;

    let created = invoke(
        &app,
        "standings",
        json!({ "httpMethod": "POST", "body": r#"{"name":"Dynamo","position":1}"# }),
    )
    .await;
    assert_eq!(created["statusCode"], 201);
    assert_eq!(created["headers"]["Content-Type"], "application/json");
    assert_eq!(body_of(&created)["team"]["name"], "Dynamo");

    // A missing method means GET.
    let listed = invoke(&app, "standings", json!({ "queryStringParameters": null })).await;
    assert_eq!(listed["statusCode"], 200);
    assert_eq!(body_of(&listed)["teams"][0]["name"], "Dynamo");
}

#[tokio::test]
async fn query_parameters_reach_the_service() {
    let app = test_app().await;
    let dynamo = create_team(&app, "Dynamo", 1).await;
    let spartak = create_team(&app, "Spartak", 2).await;
    send(&app, "POST", "/api/roster", Some(json!({ "team_id": dynamo, "number": 5 }))).await;
    send(&app, "POST", "/api/roster", Some(json!({ "team_id": spartak, "number": 3 }))).await;

    let envelope = invoke(
        &app,
        "roster",
        json!({ "httpMethod": "GET", "queryStringParameters": { "team_id": spartak.to_string() } }),
    )
    .await;

    let players = body_of(&envelope)["players"].as_array().unwrap().clone();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["team_id"], spartak);

    let deleted = invoke(
        &app,
        "standings",
        json!({ "httpMethod": "DELETE", "queryStringParameters": { "id": "424242" } }),
    )
    .await;
    assert_eq!(deleted["statusCode"], 200);
    assert_eq!(body_of(&deleted), json!({ "success": true }));
}

#[tokio::test]
async fn database_failures_become_error_envelopes() {
    let app = test_app().await;

    let envelope = invoke(
        &app,
        "fixtures",
        json!({ "httpMethod": "POST", "body": r#"{"home_team_id":1,"away_team_id":2}"# }),
    )
    .await;

    assert_eq!(envelope["statusCode"], 500);
    assert!(body_of(&envelope)["error"].is_string());
    assert_eq!(envelope["headers"]["Access-Control-Allow-Origin"], "*");
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let app = test_app().await;

    let response = send(&app, "POST", "/invoke/transfers", Some(json!({ "httpMethod": "GET" }))).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.json()["error"].as_str().unwrap().contains("transfers"));
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = test_app().await;

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}
