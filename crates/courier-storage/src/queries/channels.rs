// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `channel_integrations` queries.

use courier_core::{ChannelStatus, CourierError, Platform};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{CHANNEL_COLUMNS, ChannelRow};

pub async fn insert(db: &Database, row: ChannelRow) -> Result<(), CourierError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO channel_integrations (id, tenant_id, platform, provider, access_token, \
                 webhook_url, status, config, token_expiry, last_rotated, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    row.id,
                    row.tenant_id,
                    row.platform.to_string(),
                    row.provider.to_string(),
                    row.sealed_token,
                    row.webhook_url,
                    row.status.to_string(),
                    row.config.to_string(),
                    row.token_expiry,
                    row.last_rotated,
                    row.created_at,
                    row.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: &str) -> Result<Option<ChannelRow>, CourierError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ChannelRow>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {CHANNEL_COLUMNS} FROM channel_integrations WHERE id = ?1"),
                params![id],
                ChannelRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_by_tenant(db: &Database, tenant_id: &str) -> Result<Vec<ChannelRow>, CourierError> {
    let tenant_id = tenant_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<ChannelRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHANNEL_COLUMNS} FROM channel_integrations
                 WHERE tenant_id = ?1 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![tenant_id], ChannelRow::from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Every integration, oldest first.
pub async fn list_all(db: &Database) -> Result<Vec<ChannelRow>, CourierError> {
    db.connection()
        .call(|conn| -> Result<Vec<ChannelRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHANNEL_COLUMNS} FROM channel_integrations ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map([], ChannelRow::from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Oldest active integration for the (platform, tenant) pair.
pub async fn first_active(
    db: &Database,
    platform: Platform,
    tenant_id: &str,
) -> Result<Option<ChannelRow>, CourierError> {
    let platform = platform.to_string();
    let tenant_id = tenant_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ChannelRow>, rusqlite::Error> {
            conn.query_row(
                &format!(
                    "SELECT {CHANNEL_COLUMNS} FROM channel_integrations
                     WHERE platform = ?1 AND tenant_id = ?2 AND status = 'active'
                     ORDER BY created_at ASC, rowid ASC LIMIT 1"
                ),
                params![platform, tenant_id],
                ChannelRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite every mutable column. Returns the number of rows affected.
pub async fn update(db: &Database, row: ChannelRow) -> Result<usize, CourierError> {
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE channel_integrations SET tenant_id = ?2, platform = ?3, provider = ?4,
                 access_token = ?5, webhook_url = ?6, status = ?7, config = ?8,
                 token_expiry = ?9, last_rotated = ?10, updated_at = ?11
                 WHERE id = ?1",
                params![
                    row.id,
                    row.tenant_id,
                    row.platform.to_string(),
                    row.provider.to_string(),
                    row.sealed_token,
                    row.webhook_url,
                    row.status.to_string(),
                    row.config.to_string(),
                    row.token_expiry,
                    row.last_rotated,
                    row.updated_at,
                ],
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete(db: &Database, id: &str) -> Result<usize, CourierError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM channel_integrations WHERE id = ?1", params![id])
        })
        .await
        .map_err(map_tr_err)
}

/// Integrations with a `token_expiry` at or before `cutoff`, soonest first.
///
/// Canonical timestamps compare correctly as strings.
pub async fn list_expiring(db: &Database, cutoff: &str) -> Result<Vec<ChannelRow>, CourierError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<ChannelRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHANNEL_COLUMNS} FROM channel_integrations
                 WHERE token_expiry IS NOT NULL AND token_expiry <= ?1
                 ORDER BY token_expiry ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![cutoff], ChannelRow::from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Outcome of a conditional status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Changed,
    Unchanged,
    Missing,
}

/// Set `status` only when it differs from the current value.
pub async fn set_status(
    db: &Database,
    id: &str,
    status: ChannelStatus,
    updated_at: &str,
) -> Result<StatusChange, CourierError> {
    let id = id.to_string();
    let status = status.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| -> Result<StatusChange, rusqlite::Error> {
            let affected = conn.execute(
                "UPDATE channel_integrations SET status = ?2, updated_at = ?3
                 WHERE id = ?1 AND status != ?2",
                params![id, status, updated_at],
            )?;
            if affected > 0 {
                return Ok(StatusChange::Changed);
            }
            let exists = conn
                .query_row(
                    "SELECT 1 FROM channel_integrations WHERE id = ?1",
                    params![id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            Ok(if exists {
                StatusChange::Unchanged
            } else {
                StatusChange::Missing
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the sealed credential and stamp `last_rotated`.
pub async fn rotate_token(
    db: &Database,
    id: &str,
    sealed_token: String,
    token_expiry: Option<String>,
    rotated_at: &str,
) -> Result<usize, CourierError> {
    let id = id.to_string();
    let rotated_at = rotated_at.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE channel_integrations
                 SET access_token = ?2, token_expiry = ?3, last_rotated = ?4, updated_at = ?4
                 WHERE id = ?1",
                params![id, sealed_token, token_expiry, rotated_at],
            )
        })
        .await
        .map_err(map_tr_err)
}
