// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use courier_core::{
    types::format_timestamp, CourierError, HealthStatus, MessageContent, OutboundMessageLog,
    Platform, TokenStatus,
};
use courier_prometheus::recording::record_webhook;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, Envelope};
use crate::server::GatewayState;

fn parse_platform(name: &str) -> Result<Platform, ApiError> {
    Platform::from_str(name).map_err(|_| CourierError::not_found("platform", name).into())
}

/// GET /webhooks/{platform}
///
/// Meta subscription handshake: echoes `hub.challenge` verbatim.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Path(platform): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let platform = parse_platform(&platform)?;
    let challenge = state.ingress.verify_subscription(
        platform,
        params.get("hub.mode").map(String::as_str),
        params.get("hub.verify_token").map(String::as_str),
        params.get("hub.challenge").map(String::as_str),
    )?;
    Ok(challenge)
}

/// POST /webhooks/{platform}
pub async fn receive_webhook(
    State(state): State<GatewayState>,
    Path(platform): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Envelope<Value>>, ApiError> {
    let platform = parse_platform(&platform)?;
    let label = platform.to_string();

    match state.ingress.handle(platform, &headers, &body).await {
        Ok(receipt) => {
            record_webhook(&label, "accepted");
            Ok(Json(Envelope::ok(
                "received",
                json!({ "message_id": receipt.message_id }),
            )))
        }
        Err(e) => {
            record_webhook(&label, e.code());
            tracing::warn!(%platform, code = e.code(), error = %e, "webhook rejected");
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub recipient: String,
    pub content: MessageContent,
}

/// POST /v1/channels/{id}/messages
pub async fn send_message(
    State(state): State<GatewayState>,
    Path(channel_id): Path<String>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<Envelope<OutboundMessageLog>>, ApiError> {
    let Json(request) =
        payload.map_err(|e| CourierError::InvalidRequest(e.body_text()))?;

    let outcome = state
        .dispatcher
        .send_by_channel_id(&channel_id, &request.recipient, &request.content)
        .await?;

    match outcome.error {
        None => Ok(Json(Envelope::ok("sent", outcome.log))),
        Some(error) => {
            let data = serde_json::to_value(&outcome.log).unwrap_or(Value::Null);
            Err(ApiError::with_data(error, data))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub tenant_id: Option<String>,
}

/// GET /v1/tokens?tenant_id=
pub async fn list_tokens(
    State(state): State<GatewayState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Envelope<Vec<TokenStatus>>>, ApiError> {
    let statuses = state
        .rotation
        .token_statuses(query.tenant_id.as_deref())
        .await?;
    Ok(Json(Envelope::ok("token statuses", statuses)))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub started_at: String,
    pub components: BTreeMap<String, String>,
}

/// GET /health
///
/// Public. 503 when any component is unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let mut components = BTreeMap::new();
    let mut unhealthy = false;
    let mut degraded = false;

    for adapter in &state.health.adapters {
        let report = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => "healthy".to_string(),
            Ok(HealthStatus::Degraded(reason)) => {
                degraded = true;
                format!("degraded: {reason}")
            }
            Ok(HealthStatus::Unhealthy(reason)) => {
                unhealthy = true;
                format!("unhealthy: {reason}")
            }
            Err(e) => {
                unhealthy = true;
                format!("unhealthy: {}", e.code())
            }
        };
        components.insert(adapter.name().to_string(), report);
    }

    let (status_code, status) = if unhealthy {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if degraded {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    let clock = &state.health.clock;
    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: clock.uptime().as_secs(),
            started_at: format_timestamp(clock.started_at()),
            components,
        }),
    )
}

/// GET /metrics
///
/// Prometheus text format. 404 when no recorder is installed.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
