// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the Courier crates.
//!
//! Storage, forwarding, and notification are reached only through these
//! traits so the gateway, dispatcher, and scheduler can be tested against
//! in-memory or mock implementations.

pub mod adapter;
pub mod forwarder;
pub mod message_log;
pub mod registry;
pub mod rotation;

pub use adapter::PluginAdapter;
pub use forwarder::MessageForwarder;
pub use message_log::MessageLog;
pub use registry::ChannelRegistry;
pub use rotation::{Notifier, RefreshedToken, TokenExpiryWarning, TokenRefresher};
