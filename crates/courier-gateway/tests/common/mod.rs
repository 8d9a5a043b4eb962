// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and request helpers shared by the gateway tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use courier_config::model::{DispatchConfig, RotationConfig};
use courier_core::{MessageLog, Platform, PluginAdapter, ServiceClock};
use courier_dispatch::Dispatcher;
use courier_gateway::{
    router, AuthConfig, GatewayState, HealthState, PlatformSecrets, WebhookIngress, WebhookSecrets,
};
use courier_scheduler::TokenRotationScheduler;
use courier_test_utils::{MockForwarder, MockNotifier, TestStore};
use serde_json::Value;
use tower::ServiceExt;

pub const WA_SECRET: &str = "wa-secret";
pub const WA_VERIFY: &str = "wa-verify";
pub const MAILCHIMP_SECRET: &str = "mc-secret";
pub const API_TOKEN: &str = "api-token";

pub struct TestApp {
    pub router: Router,
    pub harness: TestStore,
    pub forwarder: MockForwarder,
}

pub struct Options {
    pub forwarder: MockForwarder,
    pub provider_base: String,
    pub bearer_token: Option<String>,
    pub log: Option<Arc<dyn MessageLog>>,
    pub adapters: Option<Vec<Arc<dyn PluginAdapter>>>,
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            forwarder: MockForwarder::new(),
            provider_base: "http://127.0.0.1:9".to_string(),
            bearer_token: Some(API_TOKEN.to_string()),
            log: None,
            adapters: None,
            prometheus_render: None,
        }
    }
}

pub fn secrets() -> WebhookSecrets {
    WebhookSecrets::new()
        .with(
            Platform::WhatsApp,
            PlatformSecrets {
                secret: Some(WA_SECRET.into()),
                verify_token: Some(WA_VERIFY.into()),
                secret_token: None,
            },
        )
        .with(
            Platform::Mailchimp,
            PlatformSecrets {
                secret: Some(MAILCHIMP_SECRET.into()),
                ..PlatformSecrets::default()
            },
        )
}

pub async fn app() -> TestApp {
    app_with(Options::default()).await
}

pub async fn app_with(options: Options) -> TestApp {
    let harness = TestStore::new().await.unwrap();
    let log: Arc<dyn MessageLog> = options.log.unwrap_or_else(|| harness.store.clone());

    let ingress = WebhookIngress::new(secrets(), log, Arc::new(options.forwarder.clone()));
    let dispatch_config = DispatchConfig {
        timeout_secs: 2,
        graph_api_base: options.provider_base.clone(),
        dialog360_base: options.provider_base.clone(),
        twilio_base: options.provider_base.clone(),
        telegram_base: options.provider_base.clone(),
    };
    let dispatcher =
        Dispatcher::new(harness.store.clone(), harness.store.clone(), &dispatch_config).unwrap();
    let rotation = TokenRotationScheduler::new(
        harness.store.clone(),
        Arc::new(MockNotifier::new()),
        RotationConfig::default(),
    );

    let adapters = options
        .adapters
        .unwrap_or_else(|| vec![harness.store.clone() as Arc<dyn PluginAdapter>]);

    let state = GatewayState {
        ingress: Arc::new(ingress),
        dispatcher: Arc::new(dispatcher),
        rotation: Arc::new(rotation),
        auth: AuthConfig {
            bearer_token: options.bearer_token,
        },
        health: HealthState {
            clock: ServiceClock::start(),
            adapters,
            prometheus_render: options.prometheus_render,
        },
    };

    TestApp {
        router: router(state),
        harness,
        forwarder: options.forwarder,
    }
}

/// Send a request and return the status plus the body (JSON when parseable).
pub async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

pub fn webhook(platform: &str, body: Vec<u8>, headers: &[(&str, String)]) -> Request<Body> {
    let mut builder = Request::post(format!("/webhooks/{platform}"));
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }
    builder.body(Body::from(body)).unwrap()
}
