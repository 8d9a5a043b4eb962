// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailchimp list webhooks.
//!
//! Mailchimp posts `application/x-www-form-urlencoded` bodies with bracketed
//! keys (`data[merges][FNAME]=...`). Those are folded into the same JSON shape
//! a JSON-posting relay would send, then decoded once.

use chrono::NaiveDateTime;
use courier_core::{ContentType, CourierError, MessageContent, NormalizedMessage, Platform};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FlexId, require, require_text};

const PLATFORM: Platform = Platform::Mailchimp;

/// Format of `fired_at` (UTC, no zone designator).
pub const FIRED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Deserialize)]
pub struct MailchimpEvent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub fired_at: Option<String>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub id: Option<FlexId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub list_id: Option<String>,
}

/// Fold `key=value` pairs with bracketed paths into a JSON object.
///
/// Later duplicates win. A key that is both a leaf and a table keeps the table.
pub fn fold_form_pairs(pairs: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    for (key, value) in pairs {
        let path = split_bracket_key(&key);
        insert_path(&mut root, &path, value);
    }
    Value::Object(root)
}

fn split_bracket_key(key: &str) -> Vec<&str> {
    let (head, rest) = match key.find('[') {
        Some(i) => (&key[..i], &key[i..]),
        None => return vec![key],
    };
    let mut parts = vec![head];
    parts.extend(
        rest.split('[')
            .filter_map(|seg| seg.strip_suffix(']'))
            .filter(|seg| !seg.is_empty()),
    );
    parts
}

fn insert_path(map: &mut Map<String, Value>, path: &[&str], value: String) {
    match path {
        [] => {}
        [leaf] => {
            if !map.get(*leaf).is_some_and(Value::is_object) {
                map.insert((*leaf).to_string(), Value::String(value));
            }
        }
        [head, tail @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, tail, value);
            }
        }
    }
}

fn parse_fired_at(raw: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(raw.trim(), FIRED_AT_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Map a list event onto a synthetic `event` message.
pub fn to_message(
    event: MailchimpEvent,
    raw_payload: Value,
) -> Result<NormalizedMessage, CourierError> {
    let kind = require_text(event.kind, PLATFORM, "type")?;
    let fired_at = require_text(event.fired_at, PLATFORM, "fired_at")?;
    let timestamp = require(parse_fired_at(&fired_at), PLATFORM, "fired_at")?;
    let data = require(event.data, PLATFORM, "data")?;

    let list_id = require_text(event.list_id.or(data.list_id), PLATFORM, "list_id")?;
    let sender = require_text(
        data.email.or_else(|| data.id.map(FlexId::into_string)),
        PLATFORM,
        "data.email",
    )?;

    Ok(NormalizedMessage {
        platform: PLATFORM,
        message_id: format!("{list_id}:{kind}:{sender}:{timestamp}"),
        content: MessageContent {
            content_type: ContentType::Event,
            text: format!("mailchimp {kind} event for list {list_id}"),
            media: None,
        },
        sender,
        recipient: list_id,
        timestamp,
        tenant_id: None,
        channel_id: None,
        raw_payload,
    })
}
