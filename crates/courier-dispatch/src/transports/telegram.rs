// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::{ContentType, CourierError, MessageContent};
use serde_json::{json, Value};

use super::{read_response, require_media, trim_base, unavailable};
use super::{Delivery, ProviderResponse, ProviderTransport};
use crate::route::Route;

/// Telegram Bot API. The bot token is part of the path.
pub struct TelegramTransport {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramTransport {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

/// Bot API method and JSON body for `content`.
fn method_and_body(chat_id: &str, content: &MessageContent) -> Result<(&'static str, Value), CourierError> {
    let (method, field) = match content.content_type {
        ContentType::Text | ContentType::Event => {
            return Ok(("sendMessage", json!({ "chat_id": chat_id, "text": content.text })));
        }
        ContentType::Image => ("sendPhoto", "photo"),
        ContentType::Video | ContentType::Audio | ContentType::Document => ("sendDocument", "document"),
    };

    let media = require_media(content)?;
    let reference = media.url.as_ref().or(media.id.as_ref());
    let mut body = json!({ "chat_id": chat_id, field: reference });
    let caption = media.caption.as_deref().unwrap_or(content.text.as_str());
    if !caption.is_empty() {
        body["caption"] = caption.into();
    }
    Ok((method, body))
}

#[async_trait]
impl ProviderTransport for TelegramTransport {
    fn route(&self) -> Route {
        Route::Telegram
    }

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError> {
        let (method, body) = method_and_body(delivery.recipient, delivery.content)?;
        let url = format!(
            "{}/bot{}/{method}",
            self.base_url, delivery.integration.access_token
        );

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            // reqwest errors embed the URL, which contains the bot token.
            .map_err(|e| unavailable(self.route(), e.without_url()))?;
        read_response(self.route(), response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::Media;

    #[test]
    fn text_uses_send_message() {
        let (method, body) = method_and_body("123", &MessageContent::text("hello")).unwrap();
        assert_eq!(method, "sendMessage");
        assert_eq!(body, json!({"chat_id": "123", "text": "hello"}));
    }

    #[test]
    fn photo_by_file_id() {
        let content = MessageContent::media(
            ContentType::Image,
            Media {
                id: Some("AgACAgQ".into()),
                caption: Some("look".into()),
                ..Media::default()
            },
        );
        let (method, body) = method_and_body("123", &content).unwrap();
        assert_eq!(method, "sendPhoto");
        assert_eq!(body["photo"], "AgACAgQ");
        assert_eq!(body["caption"], "look");
    }

    #[test]
    fn video_falls_back_to_document() {
        let content = MessageContent::media(
            ContentType::Video,
            Media {
                url: Some("https://cdn.example/v.mp4".into()),
                ..Media::default()
            },
        );
        let (method, body) = method_and_body("9", &content).unwrap();
        assert_eq!(method, "sendDocument");
        assert!(body.get("caption").is_none());
    }
}
