// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API `Update` carrying a `message`.

use courier_core::{ContentType, CourierError, Media, MessageContent, NormalizedMessage, Platform};
use serde::Deserialize;

use super::require;

const PLATFORM: Platform = Platform::Telegram;

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    #[serde(default)]
    pub document: Option<FileRef>,
    #[serde(default)]
    pub video: Option<FileRef>,
    #[serde(default)]
    pub audio: Option<FileRef>,
    #[serde(default)]
    pub voice: Option<FileRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl Message {
    fn content(self) -> Result<MessageContent, CourierError> {
        if let Some(text) = self.text.filter(|t| !t.is_empty()) {
            return Ok(MessageContent::text(text));
        }

        let caption = self.caption.filter(|c| !c.is_empty());
        let largest_photo = self
            .photo
            .into_iter()
            .max_by_key(|p| (p.file_size.unwrap_or(0), u64::from(p.width) * u64::from(p.height)));

        let (kind, file_id, mime_type) = if let Some(photo) = largest_photo {
            (ContentType::Image, photo.file_id, None)
        } else if let Some(file) = self.video {
            (ContentType::Video, file.file_id, file.mime_type)
        } else if let Some(file) = self.audio.or(self.voice) {
            (ContentType::Audio, file.file_id, file.mime_type)
        } else if let Some(file) = self.document {
            (ContentType::Document, file.file_id, file.mime_type)
        } else {
            return Err(CourierError::Normalization {
                platform: PLATFORM,
                field: "message.text".to_string(),
            });
        };

        Ok(MessageContent::media(
            kind,
            Media {
                url: None,
                id: Some(file_id),
                mime_type,
                caption,
            },
        ))
    }
}

pub fn to_message(
    update: TelegramUpdate,
    raw_payload: serde_json::Value,
) -> Result<NormalizedMessage, CourierError> {
    let message = require(update.message, PLATFORM, "message")?;

    let message_id = require(message.message_id, PLATFORM, "message.message_id")?;
    let sender = require(message.from.as_ref().and_then(|u| u.id), PLATFORM, "message.from.id")?;
    let chat = require(message.chat.as_ref().and_then(|c| c.id), PLATFORM, "message.chat.id")?;
    let date = require(message.date, PLATFORM, "message.date")?;
    let content = message.content()?;

    Ok(NormalizedMessage {
        platform: PLATFORM,
        sender: sender.to_string(),
        recipient: chat.to_string(),
        content,
        timestamp: date,
        message_id: message_id.to_string(),
        tenant_id: None,
        channel_id: None,
        raw_payload,
    })
}

