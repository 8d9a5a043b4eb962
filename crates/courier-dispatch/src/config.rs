// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed provider settings decoded from an integration's `config` blob.

use courier_core::CourierError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetaWhatsAppConfig {
    pub phone_number_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    /// Sender number in E.164, without the `whatsapp:` prefix.
    pub from_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetaMessagingConfig {
    #[serde(default)]
    pub page_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebchatConfig {
    pub webchat_url: String,
}

/// Provider settings for one route. Routes that need nothing beyond the
/// access token carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    MetaWhatsApp(MetaWhatsAppConfig),
    Dialog360,
    Twilio(TwilioConfig),
    MetaMessaging(MetaMessagingConfig),
    Telegram,
    Webchat(WebchatConfig),
}

impl ProviderConfig {
    /// Decode `config` for `route`. A missing or mistyped key is `InvalidRequest`.
    pub fn decode(route: Route, config: &serde_json::Value) -> Result<Self, CourierError> {
        let empty = serde_json::json!({});
        let config = if config.is_null() { &empty } else { config };

        Ok(match route {
            Route::WhatsAppMeta => Self::MetaWhatsApp(parse(route, config)?),
            Route::WhatsAppDialog360 => Self::Dialog360,
            Route::WhatsAppTwilio => Self::Twilio(parse(route, config)?),
            Route::MetaMessaging => Self::MetaMessaging(parse(route, config)?),
            Route::Telegram => Self::Telegram,
            Route::Webchat => {
                let parsed: WebchatConfig = parse(route, config)?;
                if !(parsed.webchat_url.starts_with("http://") || parsed.webchat_url.starts_with("https://")) {
                    return Err(CourierError::InvalidRequest(format!(
                        "channel config for {route}: webchat_url must be an http(s) URL"
                    )));
                }
                Self::Webchat(parsed)
            }
        })
    }
}

fn parse<T: DeserializeOwned>(route: Route, config: &serde_json::Value) -> Result<T, CourierError> {
    T::deserialize(config)
        .map_err(|e| CourierError::InvalidRequest(format!("channel config for {route}: {e}")))
}
