// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hand-off of normalized messages to the downstream messaging service.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::NormalizedMessage;

#[async_trait]
pub trait MessageForwarder: Send + Sync {
    /// Deliver one message downstream. Failures surface as `Forwarding`.
    async fn forward(&self, message: &NormalizedMessage) -> Result<(), CourierError>;
}
