// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-lived token exchange for Meta Graph API credentials.

use async_trait::async_trait;
use chrono::Utc;
use courier_core::types::format_timestamp;
use courier_core::{ChannelIntegration, CourierError, RefreshedToken, TokenRefresher};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct ExchangeResponse {
    access_token: String,
    /// Seconds until expiry. Absent for non-expiring system-user tokens.
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchanges a Meta access token for a fresh long-lived one via
/// `GET {graph}/oauth/access_token?grant_type=fb_exchange_token`.
pub struct MetaTokenRefresher {
    client: reqwest::Client,
    graph_api_base: String,
    app_id: String,
    app_secret: String,
}

impl std::fmt::Debug for MetaTokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaTokenRefresher")
            .field("graph_api_base", &self.graph_api_base)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[redacted]")
            .finish()
    }
}

impl MetaTokenRefresher {
    pub fn new(
        client: reqwest::Client,
        graph_api_base: &str,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            graph_api_base: graph_api_base.trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for MetaTokenRefresher {
    async fn refresh(&self, integration: &ChannelIntegration) -> Result<RefreshedToken, CourierError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/oauth/access_token", self.graph_api_base),
            &[
                ("grant_type", "fb_exchange_token"),
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_secret.as_str()),
                ("fb_exchange_token", integration.access_token.as_str()),
            ],
        )
        .map_err(|e| CourierError::Config(format!("invalid graph api base url: {e}")))?;

        debug!(channel_id = %integration.id, "exchanging meta access token");
        // Errors carry the URL, which holds the app secret and token.
        let response = self.client.get(url).send().await.map_err(|e| {
            CourierError::ProviderUnavailable {
                message: "meta token exchange failed".to_string(),
                source: Some(Box::new(e.without_url())),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CourierError::ProviderRejected {
                status: status.as_u16(),
                body,
            });
        }

        let exchanged: ExchangeResponse = response.json().await.map_err(|e| {
            CourierError::ProviderUnavailable {
                message: "meta token exchange returned an unreadable body".to_string(),
                source: Some(Box::new(e.without_url())),
            }
        })?;

        Ok(RefreshedToken {
            access_token: exchanged.access_token,
            token_expiry: exchanged
                .expires_in
                .map(|secs| format_timestamp(Utc::now() + chrono::Duration::seconds(secs))),
        })
    }
}
