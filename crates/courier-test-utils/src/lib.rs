// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Courier integration tests.
//!
//! - [`fixtures`] - sample webhook bodies and HMAC signing
//! - [`MockForwarder`], [`MockNotifier`], [`MockRefresher`] - recording collaborators
//! - [`TestStore`] - a migrated SQLite store in a temp directory

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use harness::TestStore;
pub use mocks::{MockForwarder, MockNotifier, MockRefresher};
