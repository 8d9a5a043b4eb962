// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Courier gateway.
//!
//! WAL-mode SQLite with embedded refinery migrations, a single writer via
//! `tokio-rusqlite`, and [`SqliteStore`] implementing the channel registry and
//! the inbound/outbound audit logs.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::SqliteStore;
