// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample webhook bodies shaped like each platform's real callbacks.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

/// Hex HMAC-SHA256 of `body` under `secret`, without a prefix.
pub fn hmac_hex(secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// `sha256=<hex>` header value as Meta sends it.
pub fn sign(secret: &str, body: &[u8]) -> String {
    format!("sha256={}", hmac_hex(secret, body))
}

pub fn whatsapp_text(from: &str, body: &str) -> Vec<u8> {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "102290129340398",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550783881",
                        "phone_number_id": "106540352242922"
                    },
                    "contacts": [{"profile": {"name": "Sheena Nelson"}, "wa_id": from}],
                    "messages": [{
                        "from": from,
                        "id": "wamid.HBgLMTY1MDM4Nzk0MzkVAgASGBQzQUFERjg0NDEzNDdFODU3MUMxMAA=",
                        "timestamp": "1749416383",
                        "type": "text",
                        "text": {"body": body}
                    }]
                }
            }]
        }]
    })
    .to_string()
    .into_bytes()
}

pub fn whatsapp_image(from: &str) -> Vec<u8> {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "102290129340398",
            "changes": [{
                "field": "messages",
                "value": {
                    "metadata": {"display_phone_number": "15550783881", "phone_number_id": "106540352242922"},
                    "messages": [{
                        "from": from,
                        "id": "wamid.image",
                        "timestamp": "1749416400",
                        "type": "image",
                        "image": {"id": "1003383421387256", "mime_type": "image/jpeg", "caption": "look"}
                    }]
                }
            }]
        }]
    })
    .to_string()
    .into_bytes()
}

pub fn messenger_text(object: &str, sender: &str, text: &str) -> Vec<u8> {
    json!({
        "object": object,
        "entry": [{
            "id": "PAGE_ID",
            "time": 1_700_000_000_456_i64,
            "messaging": [{
                "sender": {"id": sender},
                "recipient": {"id": "PAGE_ID"},
                "timestamp": 1_700_000_000_123_i64,
                "message": {"mid": "m_abc123", "text": text}
            }]
        }]
    })
    .to_string()
    .into_bytes()
}

pub fn telegram_text(from: i64, chat: i64, text: &str) -> Vec<u8> {
    json!({
        "update_id": 10000,
        "message": {
            "message_id": 1365,
            "from": {"id": from, "is_bot": false, "first_name": "Ada", "username": "ada"},
            "chat": {"id": chat, "type": "private", "first_name": "Ada"},
            "date": 1_700_000_000,
            "text": text
        }
    })
    .to_string()
    .into_bytes()
}

pub fn telegram_photo(from: i64, chat: i64) -> Vec<u8> {
    json!({
        "update_id": 10001,
        "message": {
            "message_id": 1366,
            "from": {"id": from, "is_bot": false, "first_name": "Ada"},
            "chat": {"id": chat, "type": "private"},
            "date": 1_700_000_100,
            "caption": "sunset",
            "photo": [
                {"file_id": "small", "file_unique_id": "s", "width": 90, "height": 67, "file_size": 1200},
                {"file_id": "large", "file_unique_id": "l", "width": 1280, "height": 960, "file_size": 98000},
                {"file_id": "medium", "file_unique_id": "m", "width": 320, "height": 240, "file_size": 14000}
            ]
        }
    })
    .to_string()
    .into_bytes()
}

pub fn webchat_text(user: &str, session: &str, text: &str) -> Vec<u8> {
    json!({
        "message_id": "wc-1",
        "user_id": user,
        "session_id": session,
        "text": text,
        "timestamp": 1_700_000_000
    })
    .to_string()
    .into_bytes()
}

/// Form-encoded body as Mailchimp posts it.
pub fn mailchimp_subscribe_form(email: &str, list_id: &str) -> Vec<u8> {
    format!(
        "type=subscribe&fired_at=2009-03-26+21%3A35%3A57&data%5Bid%5D=8a25ff1d98\
         &data%5Blist_id%5D={list_id}&data%5Bemail%5D={}&data%5Bemail_type%5D=html\
         &data%5Bmerges%5D%5BFNAME%5D=Ada",
        email.replace('@', "%40")
    )
    .into_bytes()
}

pub fn mailchimp_subscribe_json(email: &str, list_id: &str) -> Vec<u8> {
    json!({
        "type": "subscribe",
        "fired_at": "2009-03-26 21:35:57",
        "list_id": list_id,
        "data": {"id": "8a25ff1d98", "email": email, "list_id": list_id}
    })
    .to_string()
    .into_bytes()
}
