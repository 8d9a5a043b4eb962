// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::Utc;
use courier_core::types::parse_timestamp;
use courier_core::{CourierError, Platform, TokenRefresher};
use courier_scheduler::MetaTokenRefresher;
use courier_test_utils::TestStore;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn exchanges_for_long_lived_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/access_token"))
        .and(query_param("grant_type", "fb_exchange_token"))
        .and(query_param("client_id", "app-1"))
        .and(query_param("fb_exchange_token", "EAAG-expiring-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "EAAG-long-lived",
            "token_type": "bearer",
            "expires_in": 5_184_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = TestStore::new().await.unwrap();
    let channel = harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 2)
        .await
        .unwrap();

    let refresher = MetaTokenRefresher::new(reqwest::Client::new(), &server.uri(), "app-1", "shh");
    let refreshed = refresher.refresh(&channel).await.unwrap();

    assert_eq!(refreshed.access_token, "EAAG-long-lived");
    let expiry = parse_timestamp(refreshed.token_expiry.as_deref().unwrap()).unwrap();
    let days = (expiry - Utc::now()).num_days();
    assert!((59..=60).contains(&days), "{days}");
}

#[tokio::test]
async fn rejection_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":{"message":"Error validating access token"}}"#),
        )
        .mount(&server)
        .await;

    let harness = TestStore::new().await.unwrap();
    let channel = harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 2)
        .await
        .unwrap();

    let refresher = MetaTokenRefresher::new(reqwest::Client::new(), &server.uri(), "app-1", "shh");
    match refresher.refresh(&channel).await {
        Err(CourierError::ProviderRejected { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("Error validating"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn debug_hides_app_secret() {
    let refresher = MetaTokenRefresher::new(reqwest::Client::new(), "https://graph.example", "app-1", "topsecret");
    assert!(!format!("{refresher:?}").contains("topsecret"));
}
