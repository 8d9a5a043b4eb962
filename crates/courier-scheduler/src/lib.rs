// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background jobs: credential rotation scans and event reminders.

pub mod notify;
pub mod refresh;
pub mod reminders;
pub mod rotation;
pub mod validate;

pub use notify::LogNotifier;
pub use refresh::MetaTokenRefresher;
pub use reminders::ReminderScheduler;
pub use rotation::{ScanReport, TokenRotationScheduler};
pub use validate::validate_token;
