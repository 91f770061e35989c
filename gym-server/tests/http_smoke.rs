//! HTTP surface smoke tests: routing, response envelope and error
//! mapping through the real router with an in-memory store.

mod common;

use axum::body::Body;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

use common::memory_pool;
use gym_server::core::{Config, ServerState};

async fn test_app() -> axum::Router {
    let config = Config::with_overrides("/tmp/gym-test", 0);
    let state = ServerState::with_pool(config.clone(), memory_pool().await);
    gym_server::api::build_app(&config).with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn create_and_fetch_a_gym_through_the_envelope() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/gyms")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Iron Temple"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["code"], "E0000");
    assert_eq!(json["data"]["name"], "Iron Temple");
    let id = json["data"]["id"].as_i64().expect("id");

    let response = app
        .oneshot(
            Request::get(format!("/api/gyms/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn missing_resources_map_to_404_envelopes() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::get("/api/subscriptions/42").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "E0003");
}

#[tokio::test]
async fn validation_failures_map_to_400() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::post("/api/gyms")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"   "}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "E0002");
}
