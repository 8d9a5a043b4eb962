// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inbound_messages` queries. Rows are append-only apart from `processed`.

use courier_core::{CourierError, InboundMessage};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::parse_text;

pub async fn insert(db: &Database, message: InboundMessage) -> Result<(), CourierError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO inbound_messages (id, platform, payload, received_at, processed)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id,
                    message.platform.to_string(),
                    message.payload,
                    message.received_at,
                    message.processed,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Flip `processed` to true. Returns rows affected.
pub async fn mark_processed(db: &Database, id: &str) -> Result<usize, CourierError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE inbound_messages SET processed = 1 WHERE id = ?1",
                params![id],
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_unprocessed(db: &Database, limit: u32) -> Result<Vec<InboundMessage>, CourierError> {
    db.connection()
        .call(move |conn| -> Result<Vec<InboundMessage>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, platform, payload, received_at, processed FROM inbound_messages
                 WHERE processed = 0 ORDER BY received_at ASC, rowid ASC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(InboundMessage {
                    id: row.get(0)?,
                    platform: parse_text(row, 1)?,
                    payload: row.get(2)?,
                    received_at: row.get(3)?,
                    processed: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
