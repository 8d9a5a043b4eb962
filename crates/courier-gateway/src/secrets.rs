// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-platform webhook credentials (mirrors the `[webhooks.*]` config tables).

use std::collections::HashMap;

use courier_core::Platform;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct PlatformSecrets {
    /// HMAC key for signed platforms.
    pub secret: Option<String>,
    /// Meta subscription handshake token.
    pub verify_token: Option<String>,
    /// Telegram `X-Telegram-Bot-Api-Secret-Token` value.
    pub secret_token: Option<String>,
}

impl std::fmt::Debug for PlatformSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("PlatformSecrets")
            .field("secret", &redact(&self.secret))
            .field("verify_token", &redact(&self.verify_token))
            .field("secret_token", &redact(&self.secret_token))
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebhookSecrets {
    platforms: HashMap<Platform, PlatformSecrets>,
}

impl WebhookSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, platform: Platform, secrets: PlatformSecrets) -> Self {
        self.platforms.insert(platform, secrets);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<&PlatformSecrets> {
        self.platforms.get(&platform)
    }

    pub fn secret(&self, platform: Platform) -> Option<&str> {
        self.get(platform)
            .and_then(|s| s.secret.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn verify_token(&self, platform: Platform) -> Option<&str> {
        self.get(platform)
            .and_then(|s| s.verify_token.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn secret_token(&self, platform: Platform) -> Option<&str> {
        self.get(platform)
            .and_then(|s| s.secret_token.as_deref())
            .filter(|s| !s.is_empty())
    }
}
