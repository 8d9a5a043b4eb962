// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed webhook schemas, one module per platform, and the shared field helpers.

pub mod mailchimp;
pub mod messenger;
pub mod telegram;
pub mod webchat;
pub mod whatsapp;

use chrono::DateTime;
use courier_core::{CourierError, Platform};
use serde::Deserialize;

/// Unwrap a required field or fail naming its dotted path.
pub(crate) fn require<T>(value: Option<T>, platform: Platform, field: &str) -> Result<T, CourierError> {
    value.ok_or_else(|| CourierError::Normalization {
        platform,
        field: field.to_string(),
    })
}

/// Like [`require`], and also rejects empty strings.
pub(crate) fn require_text(
    value: Option<String>,
    platform: Platform,
    field: &str,
) -> Result<String, CourierError> {
    require(value.filter(|s| !s.trim().is_empty()), platform, field)
}

/// An identifier some platforms send as a string and others as a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlexId {
    Text(String),
    Number(i64),
}

impl FlexId {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// A point in time sent as unix seconds, a digit string, or RFC 3339.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UnixTime {
    Seconds(i64),
    Text(String),
}

impl UnixTime {
    pub fn seconds(&self) -> Option<i64> {
        match self {
            Self::Seconds(s) => Some(*s),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(text.trim()).ok().map(|dt| dt.timestamp())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flex_id_accepts_both_shapes() {
        let text: FlexId = serde_json::from_str("\"42\"").unwrap();
        let number: FlexId = serde_json::from_str("42").unwrap();
        assert_eq!(text.into_string(), "42");
        assert_eq!(number.into_string(), "42");
    }

    #[test]
    fn unix_time_shapes() {
        assert_eq!(UnixTime::Seconds(1_700_000_000).seconds(), Some(1_700_000_000));
        assert_eq!(UnixTime::Text("1700000000".into()).seconds(), Some(1_700_000_000));
        assert_eq!(
            UnixTime::Text("2023-11-14T22:13:20Z".into()).seconds(),
            Some(1_700_000_000)
        );
        assert_eq!(UnixTime::Text("yesterday".into()).seconds(), None);
    }

    #[test]
    fn require_text_rejects_blank() {
        let err = require_text(Some("  ".into()), Platform::Webchat, "text").unwrap_err();
        assert!(err.to_string().contains("`text`"));
    }
}
