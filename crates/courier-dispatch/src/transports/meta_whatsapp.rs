// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::CourierError;
use tracing::debug;

use super::{mismatched_config, read_response, trim_base, unavailable, whatsapp_message};
use super::{Delivery, ProviderResponse, ProviderTransport};
use crate::config::ProviderConfig;
use crate::route::Route;

/// WhatsApp Cloud API: `POST {graph}/{phone_number_id}/messages`.
pub struct MetaWhatsAppTransport {
    client: reqwest::Client,
    base_url: String,
}

impl MetaWhatsAppTransport {
    pub fn new(client: reqwest::Client, graph_api_base: &str) -> Self {
        Self {
            client,
            base_url: trim_base(graph_api_base),
        }
    }
}

#[async_trait]
impl ProviderTransport for MetaWhatsAppTransport {
    fn route(&self) -> Route {
        Route::WhatsAppMeta
    }

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError> {
        let ProviderConfig::MetaWhatsApp(config) = delivery.config else {
            return Err(mismatched_config(self.route(), delivery.config));
        };

        let mut body = whatsapp_message(delivery.recipient, delivery.content)?;
        body["messaging_product"] = "whatsapp".into();

        let url = format!("{}/{}/messages", self.base_url, config.phone_number_id);
        debug!(%url, "sending whatsapp cloud api message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&delivery.integration.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| unavailable(self.route(), e))?;
        read_response(self.route(), response).await
    }
}
