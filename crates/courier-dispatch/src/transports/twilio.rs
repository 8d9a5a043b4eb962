// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::{ContentType, CourierError};
use reqwest::header::CONTENT_TYPE;

use super::{mismatched_config, read_response, require_media, trim_base, unavailable};
use super::{Delivery, ProviderResponse, ProviderTransport};
use crate::config::ProviderConfig;
use crate::route::Route;

/// Twilio Messaging API for WhatsApp senders.
///
/// Form-encoded `POST /2010-04-01/Accounts/{sid}/Messages.json` with HTTP
/// basic auth (`account_sid:access_token`). Numbers carry the `whatsapp:`
/// prefix on the wire.
pub struct TwilioTransport {
    client: reqwest::Client,
    base_url: String,
}

impl TwilioTransport {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

#[async_trait]
impl ProviderTransport for TwilioTransport {
    fn route(&self) -> Route {
        Route::WhatsAppTwilio
    }

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError> {
        let ProviderConfig::Twilio(config) = delivery.config else {
            return Err(mismatched_config(self.route(), delivery.config));
        };

        let mut form = vec![
            ("From", whatsapp_address(&config.from_number)),
            ("To", whatsapp_address(delivery.recipient)),
        ];
        if !delivery.content.text.is_empty() {
            form.push(("Body", delivery.content.text.clone()));
        }
        if !matches!(delivery.content.content_type, ContentType::Text | ContentType::Event) {
            let media = require_media(delivery.content)?;
            let url = media.url.clone().ok_or_else(|| {
                CourierError::InvalidRequest("twilio media messages require a media url".to_string())
            })?;
            form.push(("MediaUrl", url));
        }
        let encoded = serde_urlencoded::to_string(&form)
            .map_err(|e| CourierError::Internal(format!("failed to encode twilio form: {e}")))?;

        let response = self
            .client
            .post(format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                self.base_url, config.account_sid
            ))
            .basic_auth(&config.account_sid, Some(&delivery.integration.access_token))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(encoded)
            .send()
            .await
            .map_err(|e| unavailable(self.route(), e))?;
        read_response(self.route(), response).await
    }
}
