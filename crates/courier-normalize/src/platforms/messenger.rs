// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meta Messaging API webhook (`entry[].messaging[]`), shared by Messenger and Instagram.

use courier_core::{ContentType, CourierError, Media, MessageContent, NormalizedMessage, Platform};
use serde::Deserialize;

use super::{FlexId, require, require_text};

const EVENT: &str = "entry[0].messaging[0]";

#[derive(Debug, Clone, Deserialize)]
pub struct MessengerPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<FlexId>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Party>,
    #[serde(default)]
    pub recipient: Option<Party>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub id: Option<FlexId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub payload: Option<AttachmentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPayload {
    #[serde(default)]
    pub url: Option<String>,
}

fn attachment_kind(kind: Option<&str>) -> ContentType {
    match kind {
        Some("image") => ContentType::Image,
        Some("video") => ContentType::Video,
        Some("audio") => ContentType::Audio,
        _ => ContentType::Document,
    }
}

fn party_id(party: Option<Party>) -> Option<String> {
    party.and_then(|p| p.id).map(FlexId::into_string)
}

/// Decode a Messaging API event, tagging the result with `platform`.
pub fn to_message(
    platform: Platform,
    payload: MessengerPayload,
    raw_payload: serde_json::Value,
) -> Result<NormalizedMessage, CourierError> {
    let entry = require(payload.entry.into_iter().next(), platform, "entry[0]")?;
    let event = require(entry.messaging.into_iter().next(), platform, EVENT)?;

    let sender = require_text(party_id(event.sender), platform, &format!("{EVENT}.sender.id"))?;
    let recipient = require_text(
        party_id(event.recipient),
        platform,
        &format!("{EVENT}.recipient.id"),
    )?;
    let timestamp_ms = require(event.timestamp, platform, &format!("{EVENT}.timestamp"))?;
    let message = require(event.message, platform, &format!("{EVENT}.message"))?;
    let message_id = require_text(message.mid, platform, &format!("{EVENT}.message.mid"))?;

    let content = match message.text.filter(|t| !t.is_empty()) {
        Some(text) => MessageContent::text(text),
        None => {
            let attachment = require(
                message.attachments.into_iter().next(),
                platform,
                &format!("{EVENT}.message.text"),
            )?;
            let url = require(
                attachment.payload.and_then(|p| p.url),
                platform,
                &format!("{EVENT}.message.attachments[0].payload.url"),
            )?;
            MessageContent::media(
                attachment_kind(attachment.kind.as_deref()),
                Media {
                    url: Some(url),
                    ..Media::default()
                },
            )
        }
    };

    Ok(NormalizedMessage {
        platform,
        sender,
        recipient,
        content,
        timestamp: timestamp_ms / 1000,
        message_id,
        tenant_id: None,
        channel_id: None,
        raw_payload,
    })
}
