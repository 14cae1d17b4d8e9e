//! Router-level tests for the paths that must terminate before any database
//! connection is opened. The provider below points at a closed port with a
//! short timeout: a handler that acquired a connection before validating
//! would answer 500, so every 400/404 asserted here also proves ordering.

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use inventory_api::config::{ApiConfig, AppConfig, DatabaseConfig};
use inventory_api::handlers::AppState;
use inventory_api::routes::app;

fn test_app() -> axum::Router {
    let config = AppConfig {
        database: DatabaseConfig {
            host: "127.0.0.1:1".into(),
            username: None,
            password: None,
            name: "inventory_test".into(),
            connect_timeout_secs: 1,
        },
        api: ApiConfig { port: 0, cors_origin: None, read_limit: 256 },
    };
    app(AppState::new(&config))
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn root_banner_is_served() -> Result<()> {
    let response = test_app().oneshot(get("/")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(true));
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_rejected_without_opening_a_connection() -> Result<()> {
    for uri in [
        "/devices/not-an-id",
        "/floors/1234",
        "/connections/64b5f0a1c2d3e4f5a6b7c8", // 22 hex chars
        "/users/zzzzzzzzzzzzzzzzzzzzzzzz",
    ] {
        let response = test_app().oneshot(get(uri)).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "GET {}", uri);

        let body = body_json(response).await?;
        assert_eq!(body["success"], json!(false));
        assert!(body["violations"].is_array(), "missing violations: {}", body);
    }
    Ok(())
}

#[tokio::test]
async fn malformed_id_on_delete_and_put_is_also_400() -> Result<()> {
    let response = test_app().oneshot(delete("/devices/not-an-id")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_app()
        .oneshot(send_json("PUT", "/devices/not-an-id", &json!({ "name": "x" })))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_resource_is_404() -> Result<()> {
    let response = test_app().oneshot(get("/widgets")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn post_with_missing_required_field_is_400_with_violations() -> Result<()> {
    let response = test_app()
        .oneshot(send_json("POST", "/floors", &json!({ "address": { "city": "Gdansk" } })))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v.as_str().unwrap().starts_with("name:")));
    Ok(())
}

#[tokio::test]
async fn post_with_malformed_reference_is_400() -> Result<()> {
    let response = test_app()
        .oneshot(send_json(
            "POST",
            "/devices",
            &json!({ "name": "Chair olive-bird", "modelId": "not-hex" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v.as_str().unwrap().starts_with("modelId:")));
    Ok(())
}

#[tokio::test]
async fn connection_payload_requires_both_endpoints() -> Result<()> {
    let response = test_app()
        .oneshot(send_json("POST", "/connections", &json!({ "name": "uplink" })))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    let violations: Vec<String> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(violations[0].starts_with("deviceIdFrom:"));
    assert!(violations[1].starts_with("deviceIdTo:"));
    Ok(())
}

#[tokio::test]
async fn relational_routes_validate_both_ids() -> Result<()> {
    let valid = "64b5f0a1c2d3e4f5a6b7c8d9";

    let response = test_app().oneshot(get("/connections/from/bad-id")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_app()
        .oneshot(delete(&format!("/connections/from/{}/to/bad-id", valid)))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
