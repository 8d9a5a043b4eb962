// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::{ContentType, CourierError, MessageContent};
use serde_json::{json, Value};

use super::{mismatched_config, read_response, require_media, trim_base, unavailable};
use super::{Delivery, ProviderResponse, ProviderTransport};
use crate::config::ProviderConfig;
use crate::route::Route;

/// Send API used by both Messenger and Instagram Direct.
///
/// Posts to `{graph}/{page_id}/messages` when a page id is configured and to
/// `{graph}/me/messages` otherwise; the page access token identifies the page.
pub struct MetaMessagingTransport {
    client: reqwest::Client,
    base_url: String,
}

impl MetaMessagingTransport {
    pub fn new(client: reqwest::Client, graph_api_base: &str) -> Self {
        Self {
            client,
            base_url: trim_base(graph_api_base),
        }
    }
}

fn message_object(content: &MessageContent) -> Result<Value, CourierError> {
    let kind = match content.content_type {
        ContentType::Text | ContentType::Event => return Ok(json!({ "text": content.text })),
        ContentType::Image => "image",
        ContentType::Video => "video",
        ContentType::Audio => "audio",
        ContentType::Document => "file",
    };
    let media = require_media(content)?;
    let payload = match (&media.url, &media.id) {
        (Some(url), _) => json!({ "url": url, "is_reusable": true }),
        (None, id) => json!({ "attachment_id": id }),
    };
    Ok(json!({ "attachment": { "type": kind, "payload": payload } }))
}

#[async_trait]
impl ProviderTransport for MetaMessagingTransport {
    fn route(&self) -> Route {
        Route::MetaMessaging
    }

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError> {
        let ProviderConfig::MetaMessaging(config) = delivery.config else {
            return Err(mismatched_config(self.route(), delivery.config));
        };

        let body = json!({
            "recipient": { "id": delivery.recipient },
            "messaging_type": "RESPONSE",
            "message": message_object(delivery.content)?,
        });
        let node = config.page_id.as_deref().unwrap_or("me");

        let response = self
            .client
            .post(format!("{}/{node}/messages", self.base_url))
            .bearer_auth(&delivery.integration.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| unavailable(self.route(), e))?;
        read_response(self.route(), response).await
    }
}
