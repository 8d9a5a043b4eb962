// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::CourierError;

use super::{read_response, trim_base, unavailable, whatsapp_message};
use super::{Delivery, ProviderResponse, ProviderTransport};
use crate::route::Route;

/// 360dialog authenticates with the channel API key, not a bearer token.
const API_KEY_HEADER: &str = "D360-API-KEY";

pub struct Dialog360Transport {
    client: reqwest::Client,
    base_url: String,
}

impl Dialog360Transport {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl ProviderTransport for Dialog360Transport {
    fn route(&self) -> Route {
        Route::WhatsAppDialog360
    }

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError> {
        let body = whatsapp_message(delivery.recipient, delivery.content)?;
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header(API_KEY_HEADER, &delivery.integration.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| unavailable(self.route(), e))?;
        read_response(self.route(), response).await
    }
}
