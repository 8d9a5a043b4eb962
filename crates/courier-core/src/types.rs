// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Courier workspace.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::CourierError;

/// Current time in the canonical storage format (`2026-01-01T00:00:00.000Z`).
///
/// All persisted timestamps use this format so they sort lexicographically.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Format a UTC instant in the canonical storage format.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Messaging or marketing platform a channel integration connects to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[strum(serialize = "whatsapp")]
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Messenger,
    Instagram,
    Telegram,
    Webchat,
    Mailchimp,
    GoogleCalendar,
}

impl Platform {
    /// Platforms that ride Meta's Graph API and share its webhook handshake.
    pub fn is_meta_family(self) -> bool {
        matches!(self, Self::WhatsApp | Self::Messenger | Self::Instagram)
    }
}

/// Concrete API vendor implementing a platform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Meta,
    Twilio,
    #[strum(serialize = "360dialog")]
    #[serde(rename = "360dialog")]
    Dialog360,
    Custom,
    Mailchimp,
    Google,
}

/// Lifecycle status of a channel integration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    Active,
    Disabled,
    Error,
}

/// A tenant's configured connection to one platform through one provider.
///
/// `access_token` holds the plaintext credential while in memory; the storage
/// layer encrypts it on every write and decrypts it on every read.
#[derive(Clone, PartialEq, Serialize)]
pub struct ChannelIntegration {
    pub id: String,
    pub tenant_id: String,
    pub platform: Platform,
    pub provider: Provider,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub webhook_url: Option<String>,
    pub status: ChannelStatus,
    /// Provider-specific settings, decoded on demand by the dispatcher.
    pub config: serde_json::Value,
    pub token_expiry: Option<String>,
    pub last_rotated: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl std::fmt::Debug for ChannelIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelIntegration")
            .field("id", &self.id)
            .field("tenant_id", &self.tenant_id)
            .field("platform", &self.platform)
            .field("provider", &self.provider)
            .field("access_token", &"[redacted]")
            .field("webhook_url", &self.webhook_url)
            .field("status", &self.status)
            .field("token_expiry", &self.token_expiry)
            .field("last_rotated", &self.last_rotated)
            .finish()
    }
}

impl ChannelIntegration {
    pub fn is_active(&self) -> bool {
        self.status == ChannelStatus::Active
    }
}

/// A stored integration whose credential could not be decrypted.
///
/// Carries the plaintext columns so callers can still classify expiry and
/// change status without the token.
#[derive(Debug)]
pub struct UnreadableIntegration {
    pub id: String,
    pub tenant_id: String,
    pub platform: Platform,
    pub provider: Provider,
    pub status: ChannelStatus,
    pub token_expiry: Option<String>,
    pub last_rotated: Option<String>,
    pub error: CourierError,
}

/// One row from a registry listing.
pub type ChannelRecord = Result<ChannelIntegration, UnreadableIntegration>;

/// Input for registering a new channel integration.
#[derive(Clone, Deserialize)]
pub struct NewChannelIntegration {
    pub tenant_id: String,
    pub platform: Platform,
    pub provider: Provider,
    pub access_token: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub token_expiry: Option<String>,
}

impl std::fmt::Debug for NewChannelIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewChannelIntegration")
            .field("tenant_id", &self.tenant_id)
            .field("platform", &self.platform)
            .field("provider", &self.provider)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// A raw webhook payload recorded on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub id: String,
    pub platform: Platform,
    pub payload: Vec<u8>,
    pub received_at: String,
    pub processed: bool,
}

/// Delivery state of an outbound message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutboundStatus {
    Queued,
    Sent,
    Failed,
}

impl OutboundStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued)
    }
}

/// Audit record of one outbound send attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessageLog {
    pub id: String,
    pub channel_id: String,
    pub recipient: String,
    pub content: serde_json::Value,
    pub status: OutboundStatus,
    pub response: Option<serde_json::Value>,
    pub timestamp: String,
}

/// Kind of canonical message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Audio,
    Document,
    /// Synthetic content describing a non-chat event (e.g. a list subscription).
    Event,
}

/// Attachment reference carried by a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Canonical message body shared by inbound normalization and outbound sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            text: text.into(),
            media: None,
        }
    }

    pub fn media(content_type: ContentType, media: Media) -> Self {
        Self {
            content_type,
            text: media.caption.clone().unwrap_or_default(),
            media: Some(media),
        }
    }
}

/// Platform-agnostic message produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub platform: Platform,
    pub sender: String,
    pub recipient: String,
    pub content: MessageContent,
    /// Unix seconds.
    pub timestamp: i64,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub raw_payload: serde_json::Value,
}

/// Health of a credential relative to its expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    Valid,
    ExpiringSoon,
    Expired,
}

/// Derived credential report for one integration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenStatus {
    pub channel_id: String,
    pub platform: Platform,
    pub tenant_id: String,
    pub token_expiry: Option<String>,
    pub days_until_expiry: Option<i64>,
    pub status: TokenState,
    pub last_rotated: Option<String>,
}

impl TokenStatus {
    /// Classify an integration's token at `now` given a warning window in days.
    ///
    /// Integrations without an expiry are always `Valid`. An expiry that cannot
    /// be parsed is reported as `Expired` so it is never silently trusted.
    pub fn evaluate(integration: &ChannelIntegration, now: DateTime<Utc>, warning_days: u32) -> Self {
        let (status, days) = classify_expiry(integration.token_expiry.as_deref(), now, warning_days);
        Self {
            channel_id: integration.id.clone(),
            platform: integration.platform,
            tenant_id: integration.tenant_id.clone(),
            token_expiry: integration.token_expiry.clone(),
            days_until_expiry: days,
            status,
            last_rotated: integration.last_rotated.clone(),
        }
    }

    /// Same classification for a row whose credential could not be opened.
    pub fn evaluate_unreadable(row: &UnreadableIntegration, now: DateTime<Utc>, warning_days: u32) -> Self {
        let (status, days) = classify_expiry(row.token_expiry.as_deref(), now, warning_days);
        Self {
            channel_id: row.id.clone(),
            platform: row.platform,
            tenant_id: row.tenant_id.clone(),
            token_expiry: row.token_expiry.clone(),
            days_until_expiry: days,
            status,
            last_rotated: row.last_rotated.clone(),
        }
    }

    /// Classify either kind of listed record.
    pub fn evaluate_record(record: &ChannelRecord, now: DateTime<Utc>, warning_days: u32) -> Self {
        match record {
            Ok(integration) => Self::evaluate(integration, now, warning_days),
            Err(row) => Self::evaluate_unreadable(row, now, warning_days),
        }
    }
}

fn classify_expiry(
    token_expiry: Option<&str>,
    now: DateTime<Utc>,
    warning_days: u32,
) -> (TokenState, Option<i64>) {
    match token_expiry.map(parse_timestamp) {
        None => (TokenState::Valid, None),
        Some(None) => (TokenState::Expired, None),
        Some(Some(at)) => {
            let remaining = at - now;
            let state = if at <= now {
                TokenState::Expired
            } else if remaining <= chrono::Duration::days(i64::from(warning_days)) {
                TokenState::ExpiringSoon
            } else {
                TokenState::Valid
            };
            (state, Some(remaining.num_days()))
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Forwarder,
    Notifier,
    Observability,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn integration(expiry: Option<&str>) -> ChannelIntegration {
        ChannelIntegration {
            id: "ch-1".into(),
            tenant_id: "tenant-a".into(),
            platform: Platform::WhatsApp,
            provider: Provider::Meta,
            access_token: "EAAG-secret".into(),
            webhook_url: None,
            status: ChannelStatus::Active,
            config: serde_json::json!({}),
            token_expiry: expiry.map(str::to_string),
            last_rotated: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn platform_names_round_trip() {
        for platform in Platform::iter() {
            let s = platform.to_string();
            assert_eq!(Platform::from_str(&s).unwrap(), platform);
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{s}\""));
        }
        assert_eq!(Platform::GoogleCalendar.to_string(), "google_calendar");
        assert_eq!(Platform::WhatsApp.to_string(), "whatsapp");
    }

    #[test]
    fn dialog360_uses_vendor_spelling() {
        assert_eq!(Provider::Dialog360.to_string(), "360dialog");
        assert_eq!(Provider::from_str("360dialog").unwrap(), Provider::Dialog360);
        let parsed: Provider = serde_json::from_str("\"360dialog\"").unwrap();
        assert_eq!(parsed, Provider::Dialog360);
    }

    #[test]
    fn debug_redacts_access_token() {
        let debug = format!("{:?}", integration(None));
        assert!(!debug.contains("EAAG-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn serialization_omits_access_token() {
        let json = serde_json::to_value(integration(None)).unwrap();
        assert!(json.get("access_token").is_none());
    }

    #[test]
    fn message_content_serializes_type_tag() {
        let json = serde_json::to_value(MessageContent::text("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn token_status_classification() {
        let now = parse_timestamp("2026-03-01T00:00:00Z").unwrap();

        let none = TokenStatus::evaluate(&integration(None), now, 7);
        assert_eq!(none.status, TokenState::Valid);
        assert_eq!(none.days_until_expiry, None);

        let soon = TokenStatus::evaluate(&integration(Some("2026-03-03T00:00:00.000Z")), now, 7);
        assert_eq!(soon.status, TokenState::ExpiringSoon);
        assert_eq!(soon.days_until_expiry, Some(2));

        let later = TokenStatus::evaluate(&integration(Some("2026-04-01T00:00:00.000Z")), now, 7);
        assert_eq!(later.status, TokenState::Valid);

        let past = TokenStatus::evaluate(&integration(Some("2026-02-27T00:00:00.000Z")), now, 7);
        assert_eq!(past.status, TokenState::Expired);

        let garbage = TokenStatus::evaluate(&integration(Some("next tuesday")), now, 7);
        assert_eq!(garbage.status, TokenState::Expired);
    }

    #[test]
    fn unreadable_rows_are_classified_from_their_columns() {
        let now = parse_timestamp("2026-03-01T00:00:00Z").unwrap();
        let row = UnreadableIntegration {
            id: "ch-2".into(),
            tenant_id: "tenant-a".into(),
            platform: Platform::Telegram,
            provider: Provider::Custom,
            status: ChannelStatus::Active,
            token_expiry: Some("2026-02-27T00:00:00.000Z".into()),
            last_rotated: None,
            error: CourierError::Decryption("authentication tag mismatch".into()),
        };
        let status = TokenStatus::evaluate_record(&Err(row), now, 7);
        assert_eq!(status.channel_id, "ch-2");
        assert_eq!(status.status, TokenState::Expired);
        assert_eq!(status.days_until_expiry, Some(-2));
    }

    #[test]
    fn canonical_timestamps_sort_lexicographically() {
        let a = format_timestamp(parse_timestamp("2026-01-02T03:04:05+02:00").unwrap());
        let b = format_timestamp(parse_timestamp("2026-01-02T03:04:06+02:00").unwrap());
        assert_eq!(a, "2026-01-02T01:04:05.000Z");
        assert!(a < b);
    }
}
