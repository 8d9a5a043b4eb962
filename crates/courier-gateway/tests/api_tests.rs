// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated API, health, and metrics endpoints.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{app, app_with, call, Options, API_TOKEN};
use courier_config::model::StorageConfig;
use courier_core::{ChannelRegistry, ChannelStatus, Platform, PluginAdapter, Provider};
use courier_storage::SqliteStore;
use courier_vault::Vault;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn send(channel_id: &str, body: Value) -> Request<Body> {
    Request::post(format!("/v1/channels/{channel_id}/messages"))
        .header("authorization", format!("Bearer {API_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn text_body(recipient: &str, text: &str) -> Value {
    json!({"recipient": recipient, "content": {"type": "text", "text": text}})
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = app().await;

    let (status, body) = call(
        &app.router,
        Request::get("/v1/tokens").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = call(
        &app.router,
        Request::get("/v1/tokens")
            .header("authorization", "Bearer wrong")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn api_is_closed_without_configured_token() {
    let app = app_with(Options {
        bearer_token: None,
        ..Options::default()
    })
    .await;
    let (status, _) = call(
        &app.router,
        Request::get("/v1/tokens")
            .header("authorization", format!("Bearer {API_TOKEN}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn telegram_send_is_logged_as_sent() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botT/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&provider)
        .await;

    let app = app_with(Options {
        provider_base: provider.uri(),
        ..Options::default()
    })
    .await;
    let channel = app
        .harness
        .channel("tenant-a", Platform::Telegram, Provider::Custom, "T", json!({}))
        .await
        .unwrap();

    let (status, body) = call(&app.router, send(&channel.id, text_body("123", "hello"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "ok");
    assert_eq!(body["data"]["status"], "sent");
    assert_eq!(body["data"]["channel_id"], channel.id.as_str());
    assert_eq!(body["data"]["response"]["http_status"], 200);
}

#[tokio::test]
async fn disabled_channel_is_conflict() {
    let app = app().await;
    let channel = app
        .harness
        .channel("tenant-a", Platform::Telegram, Provider::Custom, "T", json!({}))
        .await
        .unwrap();
    app.harness
        .store
        .set_status(&channel.id, ChannelStatus::Disabled)
        .await
        .unwrap();

    let (status, body) = call(&app.router, send(&channel.id, text_body("123", "hello"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "channel_inactive");
}

#[tokio::test]
async fn provider_rejection_returns_failed_log() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botT/sendMessage"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"ok": false, "description": "Bad Request: chat not found"})),
        )
        .mount(&provider)
        .await;

    let app = app_with(Options {
        provider_base: provider.uri(),
        ..Options::default()
    })
    .await;
    let channel = app
        .harness
        .channel("tenant-a", Platform::Telegram, Provider::Custom, "T", json!({}))
        .await
        .unwrap();

    let (status, body) = call(&app.router, send(&channel.id, text_body("999", "hello"))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "provider_rejected");
    assert_eq!(body["data"]["status"], "failed");
}

#[tokio::test]
async fn unknown_channel_is_not_found() {
    let app = app().await;
    let (status, body) = call(&app.router, send("missing", text_body("123", "hello"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app().await;
    let request = Request::post("/v1/channels/any/messages")
        .header("authorization", format!("Bearer {API_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from("{\"recipient\": "))
        .unwrap();
    let (status, body) = call(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn token_report_filters_by_tenant() {
    let app = app().await;
    app.harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 3)
        .await
        .unwrap();
    app.harness
        .expiring_channel("tenant-b", Platform::Messenger, 60)
        .await
        .unwrap();

    let (status, body) = call(
        &app.router,
        Request::get("/v1/tokens?tenant_id=tenant-a")
            .header("authorization", format!("Bearer {API_TOKEN}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let statuses = body["data"].as_array().unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["tenant_id"], "tenant-a");
    assert_eq!(statuses[0]["status"], "expiring_soon");

    let (_, body) = call(
        &app.router,
        Request::get("/v1/tokens")
            .header("authorization", format!("Bearer {API_TOKEN}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_reports_components() {
    let app = app().await;
    let (status, body) = call(&app.router, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["sqlite"], "healthy");
    assert!(body["started_at"].as_str().is_some());
}

#[tokio::test]
async fn health_is_unavailable_when_storage_is_down() {
    let dir = tempfile::TempDir::new().unwrap();
    let broken = SqliteStore::new(
        StorageConfig {
            database_path: dir.path().join("down.db").to_string_lossy().into_owned(),
            wal_mode: true,
        },
        Vault::generate().unwrap(),
    );
    let app = app_with(Options {
        adapters: Some(vec![Arc::new(broken) as Arc<dyn PluginAdapter>]),
        ..Options::default()
    })
    .await;

    let (status, body) = call(&app.router, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn metrics_endpoint() {
    let app = app().await;
    let (status, _) = call(&app.router, Request::get("/metrics").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = app_with(Options {
        prometheus_render: Some(Arc::new(|| "courier_webhooks_total 1\n".to_string())),
        ..Options::default()
    })
    .await;
    let (status, body) = call(&app.router, Request::get("/metrics").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("courier_webhooks_total 1\n".to_string()));
}
