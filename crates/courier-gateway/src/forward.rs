// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of normalized messages to the downstream messaging service.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::{
    AdapterType, CourierError, HealthStatus, MessageForwarder, NormalizedMessage, PluginAdapter,
};
use tracing::debug;

/// Path appended to the messaging service base URL.
pub const INBOUND_PATH: &str = "/api/v1/webhooks/inbound";

/// POSTs each message as JSON to `{service_url}/api/v1/webhooks/inbound`.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    url: String,
}

impl HttpForwarder {
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, CourierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CourierError::Config(format!("failed to build forwarding HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: format!("{}{INBOUND_PATH}", service_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MessageForwarder for HttpForwarder {
    async fn forward(&self, message: &NormalizedMessage) -> Result<(), CourierError> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| CourierError::Forwarding {
                message: format!("messaging service unreachable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, message_id = %message.message_id, "forward response received");
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(CourierError::Forwarding {
            message: format!("messaging service returned {status}: {body}"),
            source: None,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpForwarder {
    fn name(&self) -> &str {
        "http-forwarder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Forwarder
    }

    async fn health_check(&self) -> Result<HealthStatus, CourierError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CourierError> {
        Ok(())
    }
}
