// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of the Courier gateway.
//!
//! Platform webhooks enter through [`ingress::WebhookIngress`], which
//! authenticates, records, normalizes, and forwards them downstream via a
//! [`MessageForwarder`](courier_core::MessageForwarder) such as
//! [`forward::HttpForwarder`]. The bearer-protected `/v1` routes expose the
//! outbound dispatcher and token reporting.

pub mod auth;
pub mod error;
pub mod forward;
pub mod handlers;
pub mod ingress;
pub mod secrets;
pub mod server;
pub mod signature;

pub use auth::AuthConfig;
pub use error::{ApiError, Envelope};
pub use forward::HttpForwarder;
pub use ingress::{IngressReceipt, WebhookIngress};
pub use secrets::{PlatformSecrets, WebhookSecrets};
pub use server::{router, start_server, GatewayState, HealthState, ServerConfig};
