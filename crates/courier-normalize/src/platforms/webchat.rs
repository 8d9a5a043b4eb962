// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webchat (Tawk.to bridge) flat message payload.

use courier_core::{CourierError, MessageContent, NormalizedMessage, Platform};
use serde::Deserialize;

use super::{FlexId, UnixTime, require, require_text};

const PLATFORM: Platform = Platform::Webchat;

#[derive(Debug, Clone, Deserialize)]
pub struct WebchatPayload {
    #[serde(default)]
    pub message_id: Option<FlexId>,
    #[serde(default)]
    pub user_id: Option<FlexId>,
    #[serde(default)]
    pub session_id: Option<FlexId>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<UnixTime>,
}

/// `received_at` stands in for a missing `timestamp`.
pub fn to_message(
    payload: WebchatPayload,
    raw_payload: serde_json::Value,
    received_at: i64,
) -> Result<NormalizedMessage, CourierError> {
    let message_id = require_text(payload.message_id.map(FlexId::into_string), PLATFORM, "message_id")?;
    let sender = require_text(payload.user_id.map(FlexId::into_string), PLATFORM, "user_id")?;
    let recipient = require_text(payload.session_id.map(FlexId::into_string), PLATFORM, "session_id")?;
    let text = require_text(payload.text, PLATFORM, "text")?;
    let timestamp = match payload.timestamp {
        Some(raw) => require(raw.seconds(), PLATFORM, "timestamp")?,
        None => received_at,
    };

    Ok(NormalizedMessage {
        platform: PLATFORM,
        sender,
        recipient,
        content: MessageContent::text(text),
        timestamp,
        message_id,
        tenant_id: None,
        channel_id: None,
        raw_payload,
    })
}
