// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators used by the token rotation scheduler.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CourierError;
use crate::types::{ChannelIntegration, Platform};

/// Warning emitted when a credential is about to expire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenExpiryWarning {
    pub channel_id: String,
    pub tenant_id: String,
    pub platform: Platform,
    pub token_expiry: String,
    pub days_until_expiry: i64,
    /// Configured contact for rotation notices, if any.
    pub notify: Option<String>,
}

/// External notification collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn token_expiring(&self, warning: &TokenExpiryWarning) -> Result<(), CourierError>;
}

/// A freshly issued credential.
#[derive(Clone)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Canonical timestamp, `None` for non-expiring tokens.
    pub token_expiry: Option<String>,
}

impl std::fmt::Debug for RefreshedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedToken")
            .field("access_token", &"[redacted]")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

/// Platform-specific flow that exchanges a credential for a new one.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, integration: &ChannelIntegration) -> Result<RefreshedToken, CourierError>;
}
