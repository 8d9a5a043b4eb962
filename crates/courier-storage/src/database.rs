// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Query modules take `&Database` and go through [`Database::connection`];
//! never open a second connection for writes.

use std::path::Path;

use courier_core::CourierError;
use tracing::debug;

use crate::migrations;

/// Map a tokio-rusqlite call error into the workspace error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> CourierError {
    CourierError::persistence(e)
}

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run migrations.
    pub async fn open(path: &str) -> Result<Self, CourierError> {
        Self::open_with(path, true).await
    }

    /// Like [`Database::open`], with WAL journaling optional.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, CourierError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(CourierError::persistence)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(CourierError::persistence)?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// In-memory database with the full schema. Used by tests.
    pub async fn open_in_memory() -> Result<Self, CourierError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(CourierError::persistence)?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), CourierError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "busy_timeout", 5000)?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(CourierError::persistence)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), CourierError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), CourierError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(CourierError::persistence)
    }
}
