//! REST surface tests over an in-memory libSQL backend.
//!
//! Each test builds the real router with a real backend and drives it with
//! `tower::ServiceExt::oneshot` — no live socket needed for a JSON API.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use doppio::setup::{SetupFlow, SetupRouteState, setup_routes};
use doppio::store::{BasketConfigStore, GrinderConfigStore, LibSqlBackend, SetupStatusStore};

async fn test_app() -> (Router, Arc<LibSqlBackend>) {
    let backend = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let flow = Arc::new(SetupFlow::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
    ));
    (setup_routes(SetupRouteState { flow }), backend)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn status_starts_incomplete_at_welcome() {
    let (app, _backend) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/setup/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], json!(false));
    assert_eq!(body["step"], json!("welcome"));
}

#[tokio::test]
async fn field_input_reports_parse_errors_in_state() {
    let (app, _backend) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/setup/grinder/fields",
        Some(json!({"field": "scale_min", "value": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grinder"]["scale_min"]["raw"], json!("abc"));
    assert_eq!(
        body["grinder"]["scale_min"]["error"],
        json!("Not a valid number")
    );
    assert_eq!(body["grinder"]["is_valid"], json!(false));
}

#[tokio::test]
async fn next_is_a_no_op_while_the_step_is_invalid() {
    let (app, _backend) = test_app().await;

    // Welcome -> GrinderSetup is unconditional
    let (_, body) = send(&app, "POST", "/api/setup/next", None).await;
    assert_eq!(body["step"], json!("grinder_setup"));

    // Blank grinder form blocks
    let (status, body) = send(&app, "POST", "/api/setup/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], json!("grinder_setup"));
}

#[tokio::test]
async fn full_flow_over_rest_persists_and_completes() {
    let (app, backend) = test_app().await;

    send(&app, "POST", "/api/setup/next", None).await;
    send(
        &app,
        "POST",
        "/api/setup/grinder/preset",
        Some(json!({"index": 1})),
    )
    .await;
    let (_, body) = send(&app, "POST", "/api/setup/next", None).await;
    assert_eq!(body["step"], json!("basket_setup"));

    send(
        &app,
        "POST",
        "/api/setup/basket/preset",
        Some(json!({"preset": "double"})),
    )
    .await;
    let (_, body) = send(&app, "POST", "/api/setup/next", None).await;
    assert_eq!(body["step"], json!("summary"));

    let (status, body) = send(&app, "POST", "/api/setup/finalize", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_loading"], json!(false));

    assert!(backend.is_complete().await.unwrap());
    let grinder = backend.current().await.unwrap().unwrap();
    assert_eq!((grinder.scale_min, grinder.scale_max), (30, 80));
    let basket = backend.active().await.unwrap().unwrap();
    assert!(basket.is_active);

    let (_, body) = send(&app, "GET", "/api/setup/status", None).await;
    assert_eq!(body["completed"], json!(true));
}

#[tokio::test]
async fn finalize_before_filling_forms_is_unprocessable() {
    let (app, backend) = test_app().await;

    let (status, body) = send(&app, "POST", "/api/setup/finalize", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        json!("Please complete all fields before finishing")
    );
    assert!(!backend.is_complete().await.unwrap());
}

#[tokio::test]
async fn skip_over_rest_installs_defaults() {
    let (app, backend) = test_app().await;

    let (status, _) = send(&app, "POST", "/api/setup/skip", None).await;
    assert_eq!(status, StatusCode::OK);

    assert!(backend.is_complete().await.unwrap());
    let grinder = backend.current().await.unwrap().unwrap();
    assert_eq!((grinder.scale_min, grinder.scale_max), (0, 100));
    let basket = backend.active().await.unwrap().unwrap();
    assert!(basket.is_active);
}

#[tokio::test]
async fn unknown_grinder_preset_is_not_found() {
    let (app, _backend) = test_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/setup/grinder/preset",
        Some(json!({"index": 99})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preset_catalog_lists_the_fixed_choices() {
    let (app, _backend) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/setup/presets", None).await;
    assert_eq!(status, StatusCode::OK);

    let grinder = body["grinder"].as_array().unwrap();
    assert_eq!(grinder.len(), 4);
    assert_eq!(grinder[0]["scale_min"], json!(1));
    assert_eq!(grinder[0]["scale_max"], json!(10));

    let basket = body["basket"].as_array().unwrap();
    assert_eq!(basket.len(), 2);
    assert_eq!(basket[1]["label"], json!("Double"));
}
