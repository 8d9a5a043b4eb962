// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `{code, message, data}` response envelope and error-to-status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courier_core::CourierError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: String,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            code: "ok".to_string(),
            message: message.into(),
            data,
        }
    }
}

/// HTTP status for each error kind.
pub fn status_for(err: &CourierError) -> StatusCode {
    match err {
        CourierError::InvalidRequest(_) | CourierError::UnsupportedPlatform { .. } => {
            StatusCode::BAD_REQUEST
        }
        CourierError::SignatureInvalid { .. } => StatusCode::FORBIDDEN,
        CourierError::NotFound { .. } => StatusCode::NOT_FOUND,
        CourierError::ChannelInactive { .. } => StatusCode::CONFLICT,
        CourierError::Normalization { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CourierError::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CourierError::ProviderRejected { .. } | CourierError::Forwarding { .. } => {
            StatusCode::BAD_GATEWAY
        }
        CourierError::Persistence { .. }
        | CourierError::Decryption(_)
        | CourierError::InvalidKeyLength { .. }
        | CourierError::Config(_)
        | CourierError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A `CourierError` rendered as an error envelope. `data` carries context
/// such as the failed outbound log.
#[derive(Debug)]
pub struct ApiError {
    pub error: CourierError,
    pub data: Value,
}

impl ApiError {
    pub fn with_data(error: CourierError, data: Value) -> Self {
        Self { error, data }
    }
}

impl From<CourierError> for ApiError {
    fn from(error: CourierError) -> Self {
        Self {
            error,
            data: Value::Null,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(code = self.error.code(), error = %self.error, "request failed");
            match &self.error {
                CourierError::Forwarding { .. } | CourierError::ProviderRejected { .. } => {
                    self.error.to_string()
                }
                _ => "internal server error".to_string(),
            }
        } else {
            self.error.to_string()
        };

        let envelope = Envelope {
            code: self.error.code().to_string(),
            message,
            data: self.data,
        };
        (status, Json(envelope)).into_response()
    }
}

pub(crate) fn unauthorized() -> (StatusCode, Json<Envelope<Value>>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(Envelope {
            code: "unauthorized".to_string(),
            message: "missing or invalid bearer token".to_string(),
            data: Value::Null,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{ChannelStatus, Platform};

    #[test]
    fn documented_status_mapping() {
        let cases = [
            (CourierError::InvalidRequest("x".into()), 400),
            (CourierError::SignatureInvalid { platform: Platform::WhatsApp }, 403),
            (CourierError::not_found("channel integration", "c1"), 404),
            (
                CourierError::ChannelInactive {
                    channel_id: "c1".into(),
                    status: ChannelStatus::Disabled,
                },
                409,
            ),
            (
                CourierError::Normalization {
                    platform: Platform::Telegram,
                    field: "message".into(),
                },
                422,
            ),
            (
                CourierError::UnsupportedPlatform {
                    platform: Platform::GoogleCalendar,
                    provider: None,
                },
                400,
            ),
            (
                CourierError::ProviderUnavailable {
                    message: "timeout".into(),
                    source: None,
                },
                503,
            ),
            (CourierError::ProviderRejected { status: 400, body: "{}".into() }, 502),
            (
                CourierError::Forwarding {
                    message: "down".into(),
                    source: None,
                },
                502,
            ),
            (CourierError::Decryption("tag".into()), 500),
            (CourierError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err).as_u16(), status, "{err}");
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let response = ApiError::from(CourierError::Decryption("tag mismatch on row 7".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
