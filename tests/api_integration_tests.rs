//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use project_notes::{
    api::{create_router, ApiCache},
    cache::EvictionPolicy,
    repository::InMemoryProjectRepository,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let cache = ApiCache::new(100, 900, EvictionPolicy::EvictOldest);
    let state = AppState::new(cache, Arc::new(InMemoryProjectRepository::new()), 300);
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn create_project(app: &Router, name: &str) -> String {
    let (status, json) = send(
        app,
        "POST",
        "/projects",
        Some(&format!(r#"{{"name":"{name}"}}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

// == Root and Health ==

#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Welcome to the Projects and Notes API!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Projects ==

#[tokio::test]
async fn test_create_project_success() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/projects", Some(r#"{"name":"  My Project "}"#)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "My Project");
    assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_create_project_validation_error() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/projects", Some(r#"{"name":"R2D2"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["errors"][0]["field"], "name");
    assert_eq!(json["errors"][0]["value"], "R2D2");
}

#[tokio::test]
async fn test_create_project_missing_name() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/projects", Some("{}")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errors"][0]["field"], "name");
}

#[tokio::test]
async fn test_list_projects() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));

    let alpha = create_project(&app, "Alpha").await;
    let beta = create_project(&app, "Beta").await;

    let (_, json) = send(&app, "GET", "/projects", None).await;
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![alpha.as_str(), beta.as_str()]);
}

// == Notes ==

#[tokio::test]
async fn test_notes_flow() {
    let app = create_test_app();
    let id = create_project(&app, "Alpha").await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/projects/{id}/notes"),
        Some(r#"{"text":"first note"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Note has been added successfully.");

    let (status, json) = send(&app, "GET", &format!("/projects/{id}/notes"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["projectId"], id.as_str());
    assert_eq!(json["total"], 1);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["notes"][0]["text"], "first note");
    assert_eq!(json["notes"][0]["projectId"], id.as_str());
}

#[tokio::test]
async fn test_notes_limit_rules() {
    let app = create_test_app();
    let id = create_project(&app, "Alpha").await;

    let (status, json) = send(&app, "GET", &format!("/projects/{id}/notes?limit=51"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Limit cannot exceed 50 notes per request");

    let (status, json) = send(&app, "GET", &format!("/projects/{id}/notes?limit=abc"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["limit"], 10);
}

#[tokio::test]
async fn test_notes_unknown_project() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/projects/nope/notes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Project not found");

    let (status, _) = send(&app, "POST", "/projects/nope/notes", Some(r#"{"text":"hello"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_note_validation_error() {
    let app = create_test_app();
    let id = create_project(&app, "Alpha").await;

    let (status, json) = send(&app, "POST", &format!("/projects/{id}/notes"), Some(r#"{"text":" x "}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errors"][0]["field"], "text");
}

#[tokio::test]
async fn test_update_note() {
    let app = create_test_app();
    let id = create_project(&app, "Alpha").await;
    send(&app, "POST", &format!("/projects/{id}/notes"), Some(r#"{"text":"draft"}"#)).await;

    let (_, page) = send(&app, "GET", &format!("/projects/{id}/notes"), None).await;
    let note_id = page["notes"][0]["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "PATCH", &format!("/notes/{note_id}"), Some(r#"{"text":"final"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Note has been updated.");

    let (_, page) = send(&app, "GET", &format!("/projects/{id}/notes"), None).await;
    assert_eq!(page["notes"][0]["text"], "final");
}

#[tokio::test]
async fn test_update_note_errors() {
    let app = create_test_app();

    let (status, json) = send(&app, "PATCH", "/notes/unknown", Some(r#"{"text":"  "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Text is required");

    let (status, json) = send(&app, "PATCH", "/notes/unknown", Some(r#"{"text":"new text"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Note not found");
}

// == Stats ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    // miss + set, then hit
    send(&app, "GET", "/projects", None).await;
    send(&app, "GET", "/projects", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["sets"], 1);
    assert_eq!(json["keys"], 1);
    assert_eq!(json["hit_rate"], 0.5);
    assert_eq!(json["max_keys"], 100);
}

// == Malformed Requests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/projects", Some("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .is_some_and(|msg| msg.starts_with("Failed to parse the request body as JSON")));
}

#[tokio::test]
async fn test_wrongly_typed_field_is_validation_error() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/projects", Some(r#"{"name":5}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["errors"][0]["field"], "name");
    assert!(json["errors"][0]["message"]
        .as_str()
        .is_some_and(|msg| msg.contains("invalid type")));
}

#[tokio::test]
async fn test_wrongly_typed_note_text() {
    let app = create_test_app();
    let id = create_project(&app, "Alpha").await;

    let (status, json) = send(&app, "POST", &format!("/projects/{id}/notes"), Some(r#"{"text":[1]}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errors"][0]["field"], "text");

    let (status, json) = send(&app, "PATCH", "/notes/any", Some(r#"{"text":true}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errors"][0]["field"], "text");
}

#[tokio::test]
async fn test_missing_content_type() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/projects")
                .body(Body::from(r#"{"name":"Alpha"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].is_string());
}
