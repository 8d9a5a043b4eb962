// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Syntactic credential checks. These never call a provider.

use std::sync::LazyLock;

use courier_core::{CourierError, Platform};
use regex::Regex;

/// Bot API tokens look like `123456789:AAH...`.
static TELEGRAM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:[A-Za-z0-9_-]+$").expect("telegram token pattern"));

/// Reject tokens that cannot possibly be valid for `platform`.
pub fn validate_token(platform: Platform, token: &str) -> Result<(), CourierError> {
    if token.trim().is_empty() {
        return Err(CourierError::InvalidRequest(format!(
            "{platform} access token is empty"
        )));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(CourierError::InvalidRequest(format!(
            "{platform} access token contains whitespace"
        )));
    }

    match platform {
        Platform::Telegram if !TELEGRAM_TOKEN.is_match(token) => Err(CourierError::InvalidRequest(
            "telegram bot token must look like `<digits>:<secret>`".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telegram_shape() {
        assert!(validate_token(Platform::Telegram, "123456:ABC-def_1").is_ok());
        assert!(validate_token(Platform::Telegram, "abc:def").is_err());
        assert!(validate_token(Platform::Telegram, "123456").is_err());
        assert!(validate_token(Platform::Telegram, "123456:").is_err());
    }

    #[test]
    fn meta_tokens_only_need_content() {
        for platform in [Platform::WhatsApp, Platform::Messenger, Platform::Instagram] {
            assert!(validate_token(platform, "EAAGm0PX4ZCpsBA").is_ok());
            assert!(validate_token(platform, "   ").is_err());
            assert!(validate_token(platform, "EAAG with space").is_err());
        }
    }
}
