// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types and column conversions.
//!
//! Query modules read and write these rows; the store converts them to the
//! domain types in `courier-core`, passing credentials through the vault.

use std::str::FromStr;

use courier_core::{
    ChannelIntegration, ChannelRecord, ChannelStatus, CourierError, Platform, Provider,
    UnreadableIntegration,
};
use courier_vault::Vault;
use rusqlite::Row;
use rusqlite::types::Type;

/// A `channel_integrations` row. `sealed_token` is vault ciphertext.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRow {
    pub id: String,
    pub tenant_id: String,
    pub platform: Platform,
    pub provider: Provider,
    pub sealed_token: String,
    pub webhook_url: Option<String>,
    pub status: ChannelStatus,
    pub config: serde_json::Value,
    pub token_expiry: Option<String>,
    pub last_rotated: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Column list shared by every `channel_integrations` SELECT, in [`ChannelRow::from_row`] order.
pub const CHANNEL_COLUMNS: &str = "id, tenant_id, platform, provider, access_token, webhook_url, \
     status, config, token_expiry, last_rotated, created_at, updated_at";

impl ChannelRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            platform: parse_text(row, 2)?,
            provider: parse_text(row, 3)?,
            sealed_token: row.get(4)?,
            webhook_url: row.get(5)?,
            status: parse_text(row, 6)?,
            config: parse_json(row, 7)?,
            token_expiry: row.get(8)?,
            last_rotated: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    /// Seal the integration's credential for storage.
    pub fn seal(integration: &ChannelIntegration, vault: &Vault) -> Result<Self, CourierError> {
        Ok(Self {
            id: integration.id.clone(),
            tenant_id: integration.tenant_id.clone(),
            platform: integration.platform,
            provider: integration.provider,
            sealed_token: vault.encrypt(&integration.access_token)?,
            webhook_url: integration.webhook_url.clone(),
            status: integration.status,
            config: integration.config.clone(),
            token_expiry: integration.token_expiry.clone(),
            last_rotated: integration.last_rotated.clone(),
            created_at: integration.created_at.clone(),
            updated_at: integration.updated_at.clone(),
        })
    }

    /// Decrypt the credential. A bad ciphertext is an error, never plaintext passthrough.
    pub fn open(self, vault: &Vault) -> Result<ChannelIntegration, CourierError> {
        let access_token = vault.decrypt(&self.sealed_token)?;
        Ok(ChannelIntegration {
            id: self.id,
            tenant_id: self.tenant_id,
            platform: self.platform,
            provider: self.provider,
            access_token,
            webhook_url: self.webhook_url,
            status: self.status,
            config: self.config,
            token_expiry: self.token_expiry,
            last_rotated: self.last_rotated,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Like [`ChannelRow::open`], but keeps the row's columns when decryption fails.
    pub fn open_record(self, vault: &Vault) -> ChannelRecord {
        match vault.decrypt(&self.sealed_token) {
            Ok(access_token) => Ok(ChannelIntegration {
                id: self.id,
                tenant_id: self.tenant_id,
                platform: self.platform,
                provider: self.provider,
                access_token,
                webhook_url: self.webhook_url,
                status: self.status,
                config: self.config,
                token_expiry: self.token_expiry,
                last_rotated: self.last_rotated,
                created_at: self.created_at,
                updated_at: self.updated_at,
            }),
            Err(error) => Err(UnreadableIntegration {
                id: self.id,
                tenant_id: self.tenant_id,
                platform: self.platform,
                provider: self.provider,
                status: self.status,
                token_expiry: self.token_expiry,
                last_rotated: self.last_rotated,
                error,
            }),
        }
    }
}

/// Read a TEXT column into any `FromStr` enum.
pub(crate) fn parse_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a TEXT column holding JSON.
pub(crate) fn parse_json(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable TEXT column holding JSON.
pub(crate) fn parse_optional_json(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<serde_json::Value>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        serde_json::from_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
