// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message dispatch for Courier.
//!
//! Resolves each channel integration to a [`Route`], decodes its provider
//! settings, calls the provider through a [`ProviderTransport`], and records
//! the attempt in the outbound message log.

pub mod config;
pub mod dispatcher;
pub mod route;
pub mod transports;

pub use config::ProviderConfig;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use route::Route;
pub use transports::{Delivery, ProviderResponse, ProviderTransport};
