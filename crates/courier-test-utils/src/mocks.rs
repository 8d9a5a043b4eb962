// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording test doubles for the forwarder, notifier, and refresher seams.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use courier_core::{
    ChannelIntegration, CourierError, MessageForwarder, NormalizedMessage, Notifier,
    RefreshedToken, TokenExpiryWarning, TokenRefresher,
};

/// Captures every forwarded message. Can be switched to fail.
#[derive(Clone, Default)]
pub struct MockForwarder {
    forwarded: Arc<Mutex<Vec<NormalizedMessage>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A forwarder whose every call fails with `Forwarding`.
    pub fn failing() -> Self {
        Self {
            forwarded: Arc::default(),
            fail: Arc::new(Mutex::new(true)),
        }
    }

    pub async fn forwarded(&self) -> Vec<NormalizedMessage> {
        self.forwarded.lock().await.clone()
    }

    pub async fn forwarded_count(&self) -> usize {
        self.forwarded.lock().await.len()
    }
}

#[async_trait]
impl MessageForwarder for MockForwarder {
    async fn forward(&self, message: &NormalizedMessage) -> Result<(), CourierError> {
        if *self.fail.lock().await {
            return Err(CourierError::Forwarding {
                message: "mock downstream unavailable".to_string(),
                source: None,
            });
        }
        self.forwarded.lock().await.push(message.clone());
        Ok(())
    }
}

/// Captures expiry warnings.
#[derive(Clone, Default)]
pub struct MockNotifier {
    warnings: Arc<Mutex<Vec<TokenExpiryWarning>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn warnings(&self) -> Vec<TokenExpiryWarning> {
        self.warnings.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn token_expiring(&self, warning: &TokenExpiryWarning) -> Result<(), CourierError> {
        self.warnings.lock().await.push(warning.clone());
        Ok(())
    }
}

/// Hands out a fixed token, or fails for chosen channel ids.
#[derive(Clone)]
pub struct MockRefresher {
    token: RefreshedToken,
    failing_channels: Arc<Vec<String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRefresher {
    pub fn new(access_token: &str, token_expiry: Option<&str>) -> Self {
        Self {
            token: RefreshedToken {
                access_token: access_token.to_string(),
                token_expiry: token_expiry.map(str::to_string),
            },
            failing_channels: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Fail refreshes for the given channel ids.
    pub fn failing_for(mut self, channel_ids: &[&str]) -> Self {
        self.failing_channels = Arc::new(channel_ids.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Channel ids passed to `refresh`, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl TokenRefresher for MockRefresher {
    async fn refresh(&self, integration: &ChannelIntegration) -> Result<RefreshedToken, CourierError> {
        self.calls.lock().await.push(integration.id.clone());
        if self.failing_channels.contains(&integration.id) {
            return Err(CourierError::ProviderRejected {
                status: 400,
                body: "refresh refused".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}
