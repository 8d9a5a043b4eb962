// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use courier_core::{CourierError, Notifier, TokenExpiryWarning};
use tracing::warn;

/// Emits expiry warnings as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn token_expiring(&self, warning: &TokenExpiryWarning) -> Result<(), CourierError> {
        warn!(
            channel_id = %warning.channel_id,
            tenant_id = %warning.tenant_id,
            platform = %warning.platform,
            token_expiry = %warning.token_expiry,
            days_until_expiry = warning.days_until_expiry,
            notify = warning.notify.as_deref().unwrap_or("-"),
            "access token expiring soon"
        );
        Ok(())
    }
}
