// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel Registry: persistent store of channel integrations.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::{
    ChannelIntegration, ChannelRecord, ChannelStatus, NewChannelIntegration, Platform,
};

/// Persistent store of [`ChannelIntegration`] records.
///
/// Implementations encrypt `access_token` on write and decrypt it on read.
/// Listings return one [`ChannelRecord`] per row so a credential that fails
/// to decrypt surfaces as that row's `Err` instead of failing the listing.
/// They do not log; callers log mutations and unreadable rows.
#[async_trait]
pub trait ChannelRegistry: Send + Sync {
    /// Assigns a fresh id, sets `status = active`, stamps timestamps, and persists.
    async fn create(&self, new: NewChannelIntegration) -> Result<ChannelIntegration, CourierError>;

    /// Fails with `NotFound` when no row matches.
    async fn get_by_id(&self, id: &str) -> Result<ChannelIntegration, CourierError>;

    /// Every integration across tenants, oldest first.
    async fn list_all(&self) -> Result<Vec<ChannelRecord>, CourierError>;

    async fn get_by_tenant(&self, tenant_id: &str) -> Result<Vec<ChannelRecord>, CourierError>;

    /// First active integration for the pair, oldest first. `NotFound` if none.
    async fn get_by_platform_and_tenant(
        &self,
        platform: Platform,
        tenant_id: &str,
    ) -> Result<ChannelIntegration, CourierError>;

    /// Stamps `updated_at` and persists the full row. `NotFound` if the id is unknown.
    async fn update(&self, integration: &ChannelIntegration) -> Result<ChannelIntegration, CourierError>;

    /// Hard delete. `NotFound` if absent.
    async fn delete(&self, id: &str) -> Result<(), CourierError>;

    /// Integrations whose `token_expiry` is at or before `cutoff` (canonical timestamp).
    async fn list_expiring(&self, cutoff: &str) -> Result<Vec<ChannelRecord>, CourierError>;

    /// Conditional status change. Returns `false` when the row already had `status`.
    async fn set_status(&self, id: &str, status: ChannelStatus) -> Result<bool, CourierError>;

    /// Replace the credential and stamp `last_rotated`.
    async fn rotate_token(
        &self,
        id: &str,
        access_token: &str,
        token_expiry: Option<&str>,
    ) -> Result<(), CourierError>;
}
