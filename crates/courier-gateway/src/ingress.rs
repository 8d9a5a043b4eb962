// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingress pipeline.
//!
//! `received -> authenticated -> stored -> normalized -> forwarded -> processed`.
//! A failing step ends the request without undoing earlier steps: a payload
//! that fails normalization stays in the inbound log as unprocessed.
//! Storage is best-effort and never blocks forwarding.

use std::sync::Arc;

use axum::http::HeaderMap;
use courier_core::{
    CourierError, MessageForwarder, MessageLog, NormalizedMessage, Platform,
};
use courier_prometheus::recording::record_persistence_failure;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::secrets::WebhookSecrets;
use crate::signature::{constant_time_eq, verify_hmac_sha256};

const META_SIGNATURE_HEADERS: [&str; 2] = ["x-hub-signature-256", "x-hub-signature"];
const MAILCHIMP_SIGNATURE_HEADER: &str = "x-mailchimp-signature";
const TAWK_SIGNATURE_HEADER: &str = "x-tawk-signature";
const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Outcome of an accepted webhook.
#[derive(Debug, Clone)]
pub struct IngressReceipt {
    pub message_id: String,
    /// `None` when the inbound row could not be stored.
    pub inbound_id: Option<String>,
    pub message: NormalizedMessage,
}

pub struct WebhookIngress {
    secrets: WebhookSecrets,
    log: Arc<dyn MessageLog>,
    forwarder: Arc<dyn MessageForwarder>,
}

impl WebhookIngress {
    pub fn new(
        secrets: WebhookSecrets,
        log: Arc<dyn MessageLog>,
        forwarder: Arc<dyn MessageForwarder>,
    ) -> Self {
        Self {
            secrets,
            log,
            forwarder,
        }
    }

    /// Platforms whose webhooks are accepted without any authentication.
    pub fn unauthenticated_platforms(&self) -> Vec<Platform> {
        Platform::iter()
            .filter(|p| *p == Platform::Telegram && self.secrets.secret_token(*p).is_none())
            .collect()
    }

    /// Signed platforms with no secret configured; all their webhooks are rejected.
    pub fn unconfigured_platforms(&self) -> Vec<Platform> {
        Platform::iter()
            .filter(|p| is_signed(*p) && self.secrets.secret(*p).is_none())
            .collect()
    }

    /// Meta subscription handshake. Returns the challenge to echo back.
    pub fn verify_subscription(
        &self,
        platform: Platform,
        mode: Option<&str>,
        verify_token: Option<&str>,
        challenge: Option<&str>,
    ) -> Result<String, CourierError> {
        if !platform.is_meta_family() {
            return Err(CourierError::UnsupportedPlatform {
                platform,
                provider: None,
            });
        }
        let expected = self.secrets.verify_token(platform);
        let token_ok = match (expected, verify_token) {
            (Some(expected), Some(given)) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
            _ => false,
        };
        match (mode, challenge) {
            (Some("subscribe"), Some(challenge)) if token_ok => {
                info!(%platform, "webhook subscription verified");
                Ok(challenge.to_string())
            }
            _ => {
                warn!(%platform, "webhook subscription verification failed");
                Err(CourierError::SignatureInvalid { platform })
            }
        }
    }

    /// Check the platform's authentication header against its configured secret.
    pub fn authenticate(
        &self,
        platform: Platform,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<(), CourierError> {
        let rejected = || CourierError::SignatureInvalid { platform };

        if platform == Platform::Telegram {
            let Some(expected) = self.secrets.secret_token(platform) else {
                return Ok(());
            };
            let given = header(headers, TELEGRAM_SECRET_HEADER).ok_or_else(rejected)?;
            return if constant_time_eq(expected.as_bytes(), given.as_bytes()) {
                Ok(())
            } else {
                Err(rejected())
            };
        }

        let signature = match platform {
            Platform::WhatsApp | Platform::Messenger | Platform::Instagram => META_SIGNATURE_HEADERS
                .iter()
                .find_map(|name| header(headers, name)),
            Platform::Mailchimp => header(headers, MAILCHIMP_SIGNATURE_HEADER),
            Platform::Webchat => header(headers, TAWK_SIGNATURE_HEADER),
            Platform::Telegram | Platform::GoogleCalendar => None,
        };
        let secret = self.secrets.secret(platform);

        match (signature, secret) {
            (Some(signature), Some(secret)) if verify_hmac_sha256(body, signature, secret) => Ok(()),
            (None, _) => {
                debug!(%platform, "webhook without signature header");
                Err(rejected())
            }
            (_, None) => {
                warn!(%platform, "webhook rejected: no signing secret configured");
                Err(rejected())
            }
            _ => Err(rejected()),
        }
    }

    /// Run one webhook through the pipeline.
    pub async fn handle(
        &self,
        platform: Platform,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<IngressReceipt, CourierError> {
        if platform == Platform::GoogleCalendar {
            return Err(CourierError::UnsupportedPlatform {
                platform,
                provider: None,
            });
        }
        if body.is_empty() {
            return Err(CourierError::InvalidRequest("webhook body is empty".to_string()));
        }

        self.authenticate(platform, headers, body)?;

        let inbound_id = match self.log.record_inbound(platform, body).await {
            Ok(row) => Some(row.id),
            Err(e) => {
                record_persistence_failure("inbound_messages");
                warn!(%platform, error = %e, "failed to store inbound webhook, continuing");
                None
            }
        };

        let message = courier_normalize::normalize(platform, body)?;
        debug!(%platform, message_id = %message.message_id, "webhook normalized");

        self.forwarder.forward(&message).await.map_err(|e| match e {
            CourierError::Forwarding { .. } => e,
            other => CourierError::Forwarding {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        })?;

        if let Some(id) = &inbound_id
            && let Err(e) = self.log.mark_processed(id).await
        {
            record_persistence_failure("inbound_messages");
            warn!(%platform, inbound_id = %id, error = %e, "failed to mark inbound webhook processed");
        }

        info!(
            %platform,
            message_id = %message.message_id,
            sender = %message.sender,
            "webhook forwarded"
        );
        Ok(IngressReceipt {
            message_id: message.message_id.clone(),
            inbound_id,
            message,
        })
    }
}

fn is_signed(platform: Platform) -> bool {
    matches!(
        platform,
        Platform::WhatsApp
            | Platform::Messenger
            | Platform::Instagram
            | Platform::Mailchimp
            | Platform::Webchat
    )
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
