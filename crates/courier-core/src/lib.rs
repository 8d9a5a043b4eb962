// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier messaging gateway.
//!
//! Defines the error taxonomy, the domain model (channel integrations,
//! inbound/outbound logs, the canonical normalized message), and the trait
//! seams that connect storage, ingress, dispatch, and rotation.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

pub use clock::ServiceClock;
pub use error::CourierError;
pub use types::{
    AdapterType, ChannelIntegration, ChannelRecord, ChannelStatus, ContentType, HealthStatus,
    InboundMessage, Media, MessageContent, NewChannelIntegration, NormalizedMessage,
    OutboundMessageLog, OutboundStatus, Platform, Provider, TokenState, TokenStatus,
    UnreadableIntegration,
};

pub use traits::{
    ChannelRegistry, MessageForwarder, MessageLog, Notifier, PluginAdapter, RefreshedToken,
    TokenExpiryWarning, TokenRefresher,
};
