//! Integration tests for the gateway HTTP surface, driven through the
//! router with an in-memory store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use burrow_gateway::app::App;
use burrow_gateway::state::AppState;
use burrow_service::{FormatConfig, ResolverService, ShortenerService, UrlFormatter};
use burrow_store::InMemoryStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(format: FormatConfig) -> Router {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        Arc::new(ShortenerService::shared(Arc::clone(&store))),
        Arc::new(ResolverService::shared(store)),
        UrlFormatter::new(format),
    );
    App::router(state)
}

fn app() -> Router {
    app_with(
        FormatConfig::builder()
            .site_base_url("http://short.example/")
            .build(),
    )
}

async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse json body")
}

async fn create(app: &Router, payload: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/urls")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response_json(response.into_body()).await;
    (status, body)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn create_and_redirect_round_trip() {
    let app = app();

    let (status, body) = create(
        &app,
        json!({ "target_url": "https://example.org/a/b?c=1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let key = body["key"].as_str().unwrap().to_owned();
    assert_eq!(
        body["short_url"].as_str().unwrap(),
        format!("http://short.example/?key={key}")
    );

    let response = get(&app, &format!("/?key={key}")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.org/a/b?c=1"
    );
}

#[tokio::test]
async fn creating_the_same_url_twice_returns_the_same_key() {
    let app = app();
    let payload = json!({ "target_url": "https://example.org/stable" });

    let (_, first) = create(&app, payload.clone()).await;
    let (status, second) = create(&app, payload).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["key"], second["key"]);
}

#[tokio::test]
async fn unknown_key_is_404() {
    let app = app();

    let response = get(&app, "/?key=ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_key_parameter_is_404() {
    let app = app();

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_custom_key_is_400() {
    let app = app();

    let (status, _) = create(
        &app,
        json!({ "target_url": "https://example.org", "url_key": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_key_conflict_is_409() {
    let app = app();

    let (status, _) = create(
        &app,
        json!({ "target_url": "https://a.example", "url_key": "taken" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create(
        &app,
        json!({ "target_url": "https://b.example", "url_key": "taken" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn one_time_key_redirects_exactly_once() {
    let app = app();

    let (_, body) = create(
        &app,
        json!({ "target_url": "https://example.org/secret", "delete_on_use": true }),
    )
    .await;
    let key = body["key"].as_str().unwrap().to_owned();

    let first = get(&app, &format!("/?key={key}")).await;
    assert_eq!(first.status(), StatusCode::TEMPORARY_REDIRECT);

    let second = get(&app, &format!("/?key={key}")).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_redirect_parameter_name_is_honored() {
    let app = app_with(
        FormatConfig::builder()
            .site_base_url("http://short.example/")
            .redirect_param_name("t")
            .build(),
    );

    let (_, body) = create(&app, json!({ "target_url": "https://example.org" })).await;
    let key = body["key"].as_str().unwrap().to_owned();
    assert_eq!(
        body["short_url"].as_str().unwrap(),
        format!("http://short.example/?t={key}")
    );

    let response = get(&app, &format!("/?t={key}")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    // The default parameter name no longer resolves.
    let response = get(&app, &format!("/?key={key}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn speaking_urls_render_from_the_template() {
    let app = app_with(
        FormatConfig::builder()
            .site_base_url("http://short.example/")
            .create_speaking_urls(true)
            .speaking_url_template("https://###HTTP_HOST###/go/###TINY_URL_KEY###")
            .build(),
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/urls")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::HOST, "short.example")
                .body(Body::from(
                    json!({ "target_url": "https://example.org" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response.into_body()).await;
    let key = body["key"].as_str().unwrap();
    assert_eq!(
        body["short_url"].as_str().unwrap(),
        format!("https://short.example/go/{key}")
    );
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
}
