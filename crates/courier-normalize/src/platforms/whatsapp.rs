// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API webhook (`entry[].changes[].value.messages[]`).

use courier_core::{ContentType, CourierError, Media, MessageContent, NormalizedMessage, Platform};
use serde::Deserialize;

use super::{FlexId, UnixTime, require, require_text};

const PLATFORM: Platform = Platform::WhatsApp;
const MESSAGE: &str = "entry[0].changes[0].value.messages[0]";

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppPayload {
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
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub display_phone_number: Option<String>,
    #[serde(default)]
    pub phone_number_id: Option<FlexId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<FlexId>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<UnixTime>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub image: Option<MediaObject>,
    #[serde(default)]
    pub video: Option<MediaObject>,
    #[serde(default)]
    pub audio: Option<MediaObject>,
    #[serde(default)]
    pub document: Option<MediaObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl Message {
    fn content(self) -> Result<MessageContent, CourierError> {
        let media = [
            (ContentType::Image, self.image),
            (ContentType::Video, self.video),
            (ContentType::Audio, self.audio),
            (ContentType::Document, self.document),
        ]
        .into_iter()
        .find_map(|(kind, object)| object.map(|o| (kind, o)));

        if let Some(body) = self.text.and_then(|t| t.body).filter(|b| !b.is_empty()) {
            return Ok(MessageContent::text(body));
        }
        match media {
            Some((kind, object)) => Ok(MessageContent::media(
                kind,
                Media {
                    url: object.link,
                    id: object.id,
                    mime_type: object.mime_type,
                    caption: object.caption,
                },
            )),
            None => Err(CourierError::Normalization {
                platform: PLATFORM,
                field: format!("{MESSAGE}.text.body"),
            }),
        }
    }
}

pub fn to_message(
    payload: WhatsAppPayload,
    raw_payload: serde_json::Value,
) -> Result<NormalizedMessage, CourierError> {
    let entry = require(payload.entry.into_iter().next(), PLATFORM, "entry[0]")?;
    let change = require(entry.changes.into_iter().next(), PLATFORM, "entry[0].changes[0]")?;
    let value = require(change.value, PLATFORM, "entry[0].changes[0].value")?;

    let recipient = value.metadata.and_then(|m| {
        m.phone_number_id
            .map(FlexId::into_string)
            .or(m.display_phone_number)
    });
    let recipient = require_text(recipient, PLATFORM, "entry[0].changes[0].value.metadata.phone_number_id")?;

    let message = require(value.messages.into_iter().next(), PLATFORM, MESSAGE)?;
    let sender = require_text(
        message.from.clone().map(FlexId::into_string),
        PLATFORM,
        &format!("{MESSAGE}.from"),
    )?;
    let message_id = require_text(message.id.clone(), PLATFORM, &format!("{MESSAGE}.id"))?;
    let timestamp = require(
        message.timestamp.as_ref().and_then(UnixTime::seconds),
        PLATFORM,
        &format!("{MESSAGE}.timestamp"),
    )?;
    let content = message.content()?;

    Ok(NormalizedMessage {
        platform: PLATFORM,
        sender,
        recipient,
        content,
        timestamp,
        message_id,
        tenant_id: None,
        channel_id: None,
        raw_payload,
    })
}
