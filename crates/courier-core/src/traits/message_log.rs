// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit logs for inbound webhooks and outbound sends.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::{InboundMessage, MessageContent, OutboundMessageLog, OutboundStatus, Platform};

#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Record a raw webhook payload with `processed = false`.
    async fn record_inbound(
        &self,
        platform: Platform,
        payload: &[u8],
    ) -> Result<InboundMessage, CourierError>;

    /// Flip `processed` to true. The only mutation an inbound row ever sees.
    async fn mark_processed(&self, id: &str) -> Result<(), CourierError>;

    /// Inbound rows never marked processed, oldest first, for replay.
    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<InboundMessage>, CourierError>;

    /// Insert an outbound log row with `status = queued`.
    async fn open_outbound(
        &self,
        channel_id: &str,
        recipient: &str,
        content: &MessageContent,
    ) -> Result<OutboundMessageLog, CourierError>;

    /// Move a queued row to its terminal status.
    ///
    /// Succeeds at most once per row; finalizing an already-terminal row is
    /// an `InvalidRequest`.
    async fn finalize_outbound(
        &self,
        id: &str,
        status: OutboundStatus,
        response: &serde_json::Value,
    ) -> Result<OutboundMessageLog, CourierError>;

    async fn get_outbound(&self, id: &str) -> Result<OutboundMessageLog, CourierError>;
}
