// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier messaging gateway.

use thiserror::Error;

use crate::types::{ChannelStatus, Platform, Provider};

/// The primary error type used across all Courier crates.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Malformed or unreadable input supplied by the caller.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Webhook signature missing, malformed, or not matching the shared secret.
    #[error("invalid webhook signature for {platform}")]
    SignatureInvalid { platform: Platform },

    /// No record with the given identifier exists.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Outbound send attempted through a channel that is not active.
    #[error("channel {channel_id} is not active (status: {status})")]
    ChannelInactive {
        channel_id: String,
        status: ChannelStatus,
    },

    /// A platform payload is missing a required field.
    #[error("cannot normalize {platform} payload: missing or invalid `{field}`")]
    Normalization { platform: Platform, field: String },

    /// No transport exists for the platform/provider combination.
    #[error(
        "unsupported platform/provider combination: {platform}/{}",
        provider_label(.provider)
    )]
    UnsupportedPlatform {
        platform: Platform,
        provider: Option<Provider>,
    },

    /// The provider could not be reached or timed out. Retryable.
    #[error("provider unavailable: {message}")]
    ProviderUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered with a non-2xx status.
    #[error("provider rejected request with HTTP {status}: {body}")]
    ProviderRejected { status: u16, body: String },

    /// The downstream messaging service did not accept a forwarded message.
    #[error("forwarding failed: {message}")]
    Forwarding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (connection, query failure, serialization).
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stored credential could not be decrypted.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The vault key is not exactly 32 bytes.
    #[error("encryption key must be exactly 32 bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    /// Configuration errors detected at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn provider_label(provider: &Option<Provider>) -> String {
    provider.map_or_else(|| "*".to_string(), |p| p.to_string())
}

impl CourierError {
    /// Stable machine-readable code used in API error envelopes and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::SignatureInvalid { .. } => "signature_invalid",
            Self::NotFound { .. } => "not_found",
            Self::ChannelInactive { .. } => "channel_inactive",
            Self::Normalization { .. } => "normalization_error",
            Self::UnsupportedPlatform { .. } => "unsupported_platform",
            Self::ProviderUnavailable { .. } => "provider_unavailable",
            Self::ProviderRejected { .. } => "provider_rejected",
            Self::Forwarding { .. } => "forwarding_error",
            Self::Persistence { .. } => "persistence_error",
            Self::Decryption(_) => "decryption_error",
            Self::InvalidKeyLength { .. } => "invalid_key_length",
            Self::Config(_) => "config_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether a caller may reasonably retry the same operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. } | Self::Forwarding { .. })
    }

    /// Shorthand for wrapping any storage-layer error.
    pub fn persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Persistence {
            source: Box::new(err),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }
}
