// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `outbound_message_logs` queries.

use courier_core::{CourierError, OutboundMessageLog, OutboundStatus};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{parse_json, parse_optional_json, parse_text};

pub async fn insert(db: &Database, log: OutboundMessageLog) -> Result<(), CourierError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO outbound_message_logs (id, channel_id, recipient, content, status, response, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    log.id,
                    log.channel_id,
                    log.recipient,
                    log.content.to_string(),
                    log.status.to_string(),
                    log.response.map(|r| r.to_string()),
                    log.timestamp,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Move a `queued` row to `status`. Returns rows affected; zero means the row
/// is missing or already terminal.
pub async fn finalize(
    db: &Database,
    id: &str,
    status: OutboundStatus,
    response: &serde_json::Value,
) -> Result<usize, CourierError> {
    let id = id.to_string();
    let status = status.to_string();
    let response = response.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE outbound_message_logs SET status = ?2, response = ?3
                 WHERE id = ?1 AND status = 'queued'",
                params![id, status, response],
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: &str) -> Result<Option<OutboundMessageLog>, CourierError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<OutboundMessageLog>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, channel_id, recipient, content, status, response, timestamp
                 FROM outbound_message_logs WHERE id = ?1",
                params![id],
                |row| {
                    Ok(OutboundMessageLog {
                        id: row.get(0)?,
                        channel_id: row.get(1)?,
                        recipient: row.get(2)?,
                        content: parse_json(row, 3)?,
                        status: parse_text(row, 4)?,
                        response: parse_optional_json(row, 5)?,
                        timestamp: row.get(6)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
