// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound send pipeline.
//!
//! Every attempt that passes the pre-flight checks leaves exactly one
//! outbound log row: inserted as `queued` before the provider is called,
//! then moved to `sent` or `failed` exactly once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use courier_config::model::DispatchConfig;
use courier_core::{
    ChannelIntegration, ChannelRegistry, ContentType, CourierError, MessageContent, MessageLog,
    OutboundMessageLog, OutboundStatus,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::route::Route;
use crate::transports::{self, Delivery, ProviderTransport};

/// Result of a send that reached the logging stage.
///
/// `log` is the finalized row. `error` is set when the row ended `failed`.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub log: OutboundMessageLog,
    pub error: Option<CourierError>,
}

impl DispatchOutcome {
    pub fn into_result(self) -> Result<OutboundMessageLog, CourierError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.log),
        }
    }
}

pub struct Dispatcher {
    registry: Arc<dyn ChannelRegistry>,
    log: Arc<dyn MessageLog>,
    transports: HashMap<Route, Arc<dyn ProviderTransport>>,
}

impl Dispatcher {
    /// Dispatcher with the built-in HTTP transport for every route.
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        log: Arc<dyn MessageLog>,
        config: &DispatchConfig,
    ) -> Result<Self, CourierError> {
        let client = transports::http_client(config)?;
        Ok(Self::with_transports(
            registry,
            log,
            transports::default_transports(&client, config),
        ))
    }

    /// Dispatcher with explicit transports. Later entries replace earlier ones for the same route.
    pub fn with_transports(
        registry: Arc<dyn ChannelRegistry>,
        log: Arc<dyn MessageLog>,
        transports: impl IntoIterator<Item = Arc<dyn ProviderTransport>>,
    ) -> Self {
        let transports = transports.into_iter().map(|t| (t.route(), t)).collect();
        Self {
            registry,
            log,
            transports,
        }
    }

    /// Look up the integration, then [`send`](Self::send).
    pub async fn send_by_channel_id(
        &self,
        channel_id: &str,
        recipient: &str,
        content: &MessageContent,
    ) -> Result<DispatchOutcome, CourierError> {
        let integration = self.registry.get_by_id(channel_id).await?;
        self.send(&integration, recipient, content).await
    }

    /// Send `content` to `recipient` through `integration`.
    ///
    /// Returns `Err` only when no log row was written: an inactive channel,
    /// invalid input, or a failed log insert. Provider and routing failures
    /// come back inside the outcome with the row finalized as `failed`.
    pub async fn send(
        &self,
        integration: &ChannelIntegration,
        recipient: &str,
        content: &MessageContent,
    ) -> Result<DispatchOutcome, CourierError> {
        if !integration.is_active() {
            return Err(CourierError::ChannelInactive {
                channel_id: integration.id.clone(),
                status: integration.status,
            });
        }
        validate_request(recipient, content)?;

        let queued = self
            .log
            .open_outbound(&integration.id, recipient, content)
            .await?;
        debug!(log_id = %queued.id, channel_id = %integration.id, "outbound message queued");

        let (status, response, error) = match self.deliver(integration, recipient, content).await {
            Ok(provider) if provider.is_success() => (
                OutboundStatus::Sent,
                json!({ "http_status": provider.status, "body": provider.body }),
                None,
            ),
            Ok(provider) => {
                let response = json!({ "http_status": provider.status, "body": provider.body });
                let body = match &provider.body {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (
                    OutboundStatus::Failed,
                    response,
                    Some(CourierError::ProviderRejected {
                        status: provider.status,
                        body,
                    }),
                )
            }
            Err(err) => (
                OutboundStatus::Failed,
                json!({ "error": err.to_string(), "code": err.code() }),
                Some(err),
            ),
        };

        let log = match self.log.finalize_outbound(&queued.id, status, &response).await {
            Ok(log) => log,
            Err(finalize_err) => {
                warn!(
                    log_id = %queued.id,
                    error = %finalize_err,
                    send_error = ?error.as_ref().map(ToString::to_string),
                    "failed to finalize outbound log"
                );
                return Err(finalize_err);
            }
        };

        courier_prometheus::recording::record_outbound(
            &integration.platform.to_string(),
            &status.to_string(),
        );
        match &error {
            None => info!(
                log_id = %log.id,
                channel_id = %integration.id,
                platform = %integration.platform,
                "outbound message sent"
            ),
            Some(err) => warn!(
                log_id = %log.id,
                channel_id = %integration.id,
                platform = %integration.platform,
                code = err.code(),
                error = %err,
                "outbound message failed"
            ),
        }

        Ok(DispatchOutcome { log, error })
    }

    async fn deliver(
        &self,
        integration: &ChannelIntegration,
        recipient: &str,
        content: &MessageContent,
    ) -> Result<transports::ProviderResponse, CourierError> {
        let route = Route::resolve(integration.platform, integration.provider)?;
        let config = ProviderConfig::decode(route, &integration.config)?;
        let transport = self.transports.get(&route).ok_or(CourierError::UnsupportedPlatform {
            platform: integration.platform,
            provider: Some(integration.provider),
        })?;

        let delivery = Delivery {
            integration,
            config: &config,
            recipient,
            content,
        };
        let started = Instant::now();
        let result = transport.deliver(&delivery).await;
        courier_prometheus::recording::record_provider_latency(
            &route.to_string(),
            started.elapsed().as_secs_f64(),
        );
        result
    }
}

fn validate_request(recipient: &str, content: &MessageContent) -> Result<(), CourierError> {
    if recipient.trim().is_empty() {
        return Err(CourierError::InvalidRequest("recipient must not be empty".to_string()));
    }
    let has_media = content.media.is_some();
    match content.content_type {
        ContentType::Text | ContentType::Event if content.text.trim().is_empty() => Err(
            CourierError::InvalidRequest("text content must not be empty".to_string()),
        ),
        ContentType::Image | ContentType::Video | ContentType::Audio | ContentType::Document
            if !has_media =>
        {
            Err(CourierError::InvalidRequest(format!(
                "{} content requires media",
                content.content_type
            )))
        }
        _ => Ok(()),
    }
}
