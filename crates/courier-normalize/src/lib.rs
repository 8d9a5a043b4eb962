// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload decoding for the Courier gateway.
//!
//! Raw webhook bytes are decoded into a typed [`InboundPayload`] (one variant
//! per platform) and then mapped to the canonical [`NormalizedMessage`]. Both
//! steps are pure. A required field that is absent or empty fails with
//! [`CourierError::Normalization`] naming the field's path; no message is ever
//! produced with a silently empty sender, recipient, or body.

pub mod platforms;

use courier_core::{CourierError, NormalizedMessage, Platform};
use serde::de::DeserializeOwned;
use tracing::debug;

use platforms::mailchimp::{self, MailchimpEvent};
use platforms::messenger::{self, MessengerPayload};
use platforms::telegram::{self, TelegramUpdate};
use platforms::webchat::{self, WebchatPayload};
use platforms::whatsapp::{self, WhatsAppPayload};

/// A webhook body decoded into its platform's schema.
#[derive(Debug, Clone)]
pub enum InboundPayload {
    WhatsApp(WhatsAppPayload),
    Messenger(MessengerPayload),
    /// Instagram rides the Messenger schema.
    Instagram(MessengerPayload),
    Telegram(TelegramUpdate),
    Webchat(WebchatPayload),
    Mailchimp(MailchimpEvent),
}

/// A decoded payload together with the JSON it came from.
#[derive(Debug, Clone)]
pub struct DecodedWebhook {
    pub payload: InboundPayload,
    pub raw: serde_json::Value,
}

impl InboundPayload {
    pub fn platform(&self) -> Platform {
        match self {
            Self::WhatsApp(_) => Platform::WhatsApp,
            Self::Messenger(_) => Platform::Messenger,
            Self::Instagram(_) => Platform::Instagram,
            Self::Telegram(_) => Platform::Telegram,
            Self::Webchat(_) => Platform::Webchat,
            Self::Mailchimp(_) => Platform::Mailchimp,
        }
    }

    /// Decode raw webhook bytes for `platform`.
    ///
    /// Mailchimp accepts both form-encoded and JSON bodies; every other
    /// platform must send JSON.
    pub fn decode(platform: Platform, body: &[u8]) -> Result<DecodedWebhook, CourierError> {
        let raw = match platform {
            Platform::Mailchimp if !looks_like_json(body) => {
                let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                    .map_err(|e| invalid_body(platform, &e))?;
                mailchimp::fold_form_pairs(pairs)
            }
            Platform::GoogleCalendar => {
                return Err(CourierError::UnsupportedPlatform {
                    platform,
                    provider: None,
                });
            }
            _ => serde_json::from_slice(body).map_err(|e| invalid_body(platform, &e))?,
        };

        let payload = match platform {
            Platform::WhatsApp => Self::WhatsApp(typed(platform, &raw)?),
            Platform::Messenger => Self::Messenger(typed(platform, &raw)?),
            Platform::Instagram => Self::Instagram(typed(platform, &raw)?),
            Platform::Telegram => Self::Telegram(typed(platform, &raw)?),
            Platform::Webchat => Self::Webchat(typed(platform, &raw)?),
            Platform::Mailchimp => Self::Mailchimp(typed(platform, &raw)?),
            Platform::GoogleCalendar => {
                return Err(CourierError::UnsupportedPlatform {
                    platform,
                    provider: None,
                });
            }
        };
        Ok(DecodedWebhook { payload, raw })
    }
}

impl DecodedWebhook {
    /// Map onto the canonical message. `received_at` (unix seconds) fills in
    /// for platforms whose timestamp is optional.
    pub fn into_message(self, received_at: i64) -> Result<NormalizedMessage, CourierError> {
        let Self { payload, raw } = self;
        match payload {
            InboundPayload::WhatsApp(p) => whatsapp::to_message(p, raw),
            InboundPayload::Messenger(p) => messenger::to_message(Platform::Messenger, p, raw),
            InboundPayload::Instagram(p) => messenger::to_message(Platform::Instagram, p, raw),
            InboundPayload::Telegram(p) => telegram::to_message(p, raw),
            InboundPayload::Webchat(p) => webchat::to_message(p, raw, received_at),
            InboundPayload::Mailchimp(p) => mailchimp::to_message(p, raw),
        }
    }
}

/// Decode and map a webhook body in one step.
pub fn normalize(platform: Platform, body: &[u8]) -> Result<NormalizedMessage, CourierError> {
    InboundPayload::decode(platform, body)?.into_message(chrono::Utc::now().timestamp())
}

fn looks_like_json(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{' || *b == b'[')
}

/// Decode into the platform schema, reporting the path of the first
/// mismatching field (`message.from.id`, `entry[0].changes`).
fn typed<T: DeserializeOwned>(platform: Platform, raw: &serde_json::Value) -> Result<T, CourierError> {
    serde_path_to_error::deserialize(raw).map_err(|e| {
        let field = match e.path().to_string() {
            root if root == "." => "body".to_string(),
            path => path,
        };
        debug!(%platform, %field, error = %e.inner(), "webhook body does not match platform schema");
        CourierError::Normalization { platform, field }
    })
}

fn invalid_body(platform: Platform, err: &dyn std::fmt::Display) -> CourierError {
    debug!(%platform, error = %err, "webhook body is not decodable");
    CourierError::Normalization {
        platform,
        field: "body".to_string(),
    }
}
