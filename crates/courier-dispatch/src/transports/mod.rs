// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider transports: one HTTP request shape per [`Route`].

mod dialog360;
mod meta_messaging;
mod meta_whatsapp;
mod telegram;
mod twilio;
mod webchat;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_config::model::DispatchConfig;
use courier_core::{ChannelIntegration, ContentType, CourierError, Media, MessageContent};
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::route::Route;

pub use dialog360::Dialog360Transport;
pub use meta_messaging::MetaMessagingTransport;
pub use meta_whatsapp::MetaWhatsAppTransport;
pub use telegram::TelegramTransport;
pub use twilio::TwilioTransport;
pub use webchat::WebchatTransport;

/// Everything a transport needs to build one provider request.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    pub integration: &'a ChannelIntegration,
    pub config: &'a ProviderConfig,
    pub recipient: &'a str,
    pub content: &'a MessageContent,
}

/// Status and body returned by the provider, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Sends one canonical message through a provider API.
///
/// Implementations return `Ok` for any HTTP answer, leaving status
/// interpretation to the dispatcher. Only network failures and timeouts are
/// `ProviderUnavailable`.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    fn route(&self) -> Route;

    async fn deliver(&self, delivery: &Delivery<'_>) -> Result<ProviderResponse, CourierError>;
}

/// Build the shared HTTP client with the configured provider timeout.
pub fn http_client(config: &DispatchConfig) -> Result<reqwest::Client, CourierError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CourierError::Config(format!("failed to build provider HTTP client: {e}")))
}

/// One transport per route, all sharing `client`.
pub fn default_transports(
    client: &reqwest::Client,
    config: &DispatchConfig,
) -> Vec<Arc<dyn ProviderTransport>> {
    vec![
        Arc::new(MetaWhatsAppTransport::new(client.clone(), &config.graph_api_base)),
        Arc::new(Dialog360Transport::new(client.clone(), &config.dialog360_base)),
        Arc::new(TwilioTransport::new(client.clone(), &config.twilio_base)),
        Arc::new(MetaMessagingTransport::new(client.clone(), &config.graph_api_base)),
        Arc::new(TelegramTransport::new(client.clone(), &config.telegram_base)),
        Arc::new(WebchatTransport::new(client.clone())),
    ]
}

/// Read status and body. Non-JSON bodies are kept as a JSON string.
pub(crate) async fn read_response(
    route: Route,
    response: reqwest::Response,
) -> Result<ProviderResponse, CourierError> {
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| unavailable(route, e))?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok(ProviderResponse { status, body })
}

pub(crate) fn unavailable(route: Route, err: reqwest::Error) -> CourierError {
    let message = if err.is_timeout() {
        format!("{route} request timed out")
    } else {
        format!("{route} request failed: {err}")
    };
    CourierError::ProviderUnavailable {
        message,
        source: Some(Box::new(err)),
    }
}

pub(crate) fn mismatched_config(route: Route, config: &ProviderConfig) -> CourierError {
    CourierError::Internal(format!("{route} transport received {config:?}"))
}

pub(crate) fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

/// The attachment of a media message. Media content without a URL or id is rejected.
pub(crate) fn require_media<'a>(content: &'a MessageContent) -> Result<&'a Media, CourierError> {
    content
        .media
        .as_ref()
        .filter(|m| m.url.is_some() || m.id.is_some())
        .ok_or_else(|| {
            CourierError::InvalidRequest(format!(
                "{} content requires media with a url or id",
                content.content_type
            ))
        })
}

/// WhatsApp message object shared by the Cloud API and 360dialog.
pub(crate) fn whatsapp_message(recipient: &str, content: &MessageContent) -> Result<Value, CourierError> {
    let kind = match content.content_type {
        ContentType::Text | ContentType::Event => {
            return Ok(json!({
                "recipient_type": "individual",
                "to": recipient,
                "type": "text",
                "text": { "body": content.text },
            }));
        }
        ContentType::Image => "image",
        ContentType::Video => "video",
        ContentType::Audio => "audio",
        ContentType::Document => "document",
    };

    let media = require_media(content)?;
    let mut object = serde_json::Map::new();
    match (&media.url, &media.id) {
        (Some(url), _) => object.insert("link".into(), json!(url)),
        (None, Some(id)) => object.insert("id".into(), json!(id)),
        (None, None) => None,
    };
    let caption = media.caption.as_deref().or((!content.text.is_empty()).then_some(content.text.as_str()));
    if let Some(caption) = caption
        && content.content_type != ContentType::Audio
    {
        object.insert("caption".into(), json!(caption));
    }

    Ok(json!({
        "recipient_type": "individual",
        "to": recipient,
        "type": kind,
        kind: Value::Object(object),
    }))
}
