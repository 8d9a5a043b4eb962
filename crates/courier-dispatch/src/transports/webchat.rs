// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::CourierError;
use serde_json::json;

use super::{mismatched_config, read_response, trim_base, unavailable};
use super::{Delivery, ProviderResponse, ProviderTransport};
use crate::config::ProviderConfig;
use crate::route::Route;

/// Tenant-hosted webchat widget backend, reached at `{webchat_url}/api/messages`.
pub struct WebchatTransport {
    client: reqwest::Client,
}

impl WebchatTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderTransport for WebchatTransport {
    fn route(&self) -> Route {
        Route::Webchat
    }

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError> {
        let ProviderConfig::Webchat(config) = delivery.config else {
            return Err(mismatched_config(self.route(), delivery.config));
        };

        let body = json!({
            "channel_id": delivery.integration.id,
            "recipient": delivery.recipient,
            "content": delivery.content,
        });
        let response = self
            .client
            .post(format!("{}/api/messages", trim_base(&config.webchat_url)))
            .bearer_auth(&delivery.integration.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| unavailable(self.route(), e))?;
        read_response(self.route(), response).await
    }
}
