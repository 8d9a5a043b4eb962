// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic credential expiry scan.
//!
//! Each scan lists integrations whose token expires within the warning
//! window. Expired ones are moved to `error`; those expiring soon produce a
//! [`Notifier`] warning and, with auto-rotation on, a refresh through the
//! platform's [`TokenRefresher`]. One integration failing never stops the scan.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use courier_config::model::RotationConfig;
use courier_core::types::format_timestamp;
use courier_core::{
    ChannelIntegration, ChannelRegistry, ChannelStatus, CourierError, Notifier, Platform,
    TokenExpiryWarning, TokenRefresher, TokenState, TokenStatus, UnreadableIntegration,
};
use courier_prometheus::recording::record_rotation;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::validate::validate_token;

/// Counts from one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: usize,
    pub deactivated: usize,
    pub warned: usize,
    pub rotated: usize,
    pub failed: usize,
}

pub struct TokenRotationScheduler {
    registry: Arc<dyn ChannelRegistry>,
    notifier: Arc<dyn Notifier>,
    refreshers: HashMap<Platform, Arc<dyn TokenRefresher>>,
    config: RotationConfig,
}

impl TokenRotationScheduler {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        notifier: Arc<dyn Notifier>,
        config: RotationConfig,
    ) -> Self {
        Self {
            registry,
            notifier,
            refreshers: HashMap::new(),
            config,
        }
    }

    /// Register the refresher used for `platform` when auto-rotation is on.
    pub fn with_refresher(mut self, platform: Platform, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refreshers.insert(platform, refresher);
        self
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Scan on every tick until `cancel` fires. The first tick is immediate.
    pub async fn run(&self, cancel: CancellationToken) {
        if !self.config.enabled {
            info!("token rotation disabled");
            return;
        }

        let period = Duration::from_secs(self.config.interval_secs.max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = period.as_secs(), "token rotation scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("token rotation scheduler shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.scan().await {
                        Ok(report) => info!(
                            scanned = report.scanned,
                            deactivated = report.deactivated,
                            warned = report.warned,
                            rotated = report.rotated,
                            failed = report.failed,
                            "token rotation scan complete"
                        ),
                        Err(e) => warn!(error = %e, "token rotation scan failed"),
                    }
                }
            }
        }
    }

    pub async fn scan(&self) -> Result<ScanReport, CourierError> {
        self.scan_at(Utc::now()).await
    }

    /// Run one scan as of `now`.
    ///
    /// Only the initial listing can fail the scan; per-integration errors are
    /// logged and counted in [`ScanReport::failed`].
    pub async fn scan_at(&self, now: DateTime<Utc>) -> Result<ScanReport, CourierError> {
        let cutoff = format_timestamp(now + chrono::Duration::days(i64::from(self.config.warning_days)));
        let candidates = self.registry.list_expiring(&cutoff).await?;

        let mut report = ScanReport {
            scanned: candidates.len(),
            ..ScanReport::default()
        };
        for record in &candidates {
            match record {
                Ok(integration) => {
                    if let Err(e) = self.process(integration, now, &mut report).await {
                        report.failed += 1;
                        record_rotation("failed");
                        warn!(
                            channel_id = %integration.id,
                            platform = %integration.platform,
                            error = %e,
                            "token rotation failed for integration"
                        );
                    }
                }
                Err(unreadable) => self.process_unreadable(unreadable, now, &mut report).await,
            }
        }
        Ok(report)
    }

    /// A row whose token cannot be decrypted always counts as failed. It is
    /// still moved to `error` once its expiry has passed.
    async fn process_unreadable(
        &self,
        row: &UnreadableIntegration,
        now: DateTime<Utc>,
        report: &mut ScanReport,
    ) {
        report.failed += 1;
        record_rotation("failed");
        warn!(
            channel_id = %row.id,
            platform = %row.platform,
            error = %row.error,
            "stored access token cannot be decrypted"
        );

        let token = TokenStatus::evaluate_unreadable(row, now, self.config.warning_days);
        if token.status != TokenState::Expired || row.status == ChannelStatus::Error {
            return;
        }
        match self.registry.set_status(&row.id, ChannelStatus::Error).await {
            Ok(true) => {
                report.deactivated += 1;
                record_rotation("deactivated");
                info!(
                    channel_id = %row.id,
                    tenant_id = %row.tenant_id,
                    platform = %row.platform,
                    "access token expired, integration moved to error"
                );
            }
            Ok(false) => {}
            Err(e) => warn!(channel_id = %row.id, error = %e, "could not move integration to error"),
        }
    }

    async fn process(
        &self,
        integration: &ChannelIntegration,
        now: DateTime<Utc>,
        report: &mut ScanReport,
    ) -> Result<(), CourierError> {
        let token = TokenStatus::evaluate(integration, now, self.config.warning_days);
        match token.status {
            TokenState::Expired => {
                if integration.status == ChannelStatus::Error {
                    debug!(channel_id = %integration.id, "expired integration already in error");
                    return Ok(());
                }
                if self.registry.set_status(&integration.id, ChannelStatus::Error).await? {
                    report.deactivated += 1;
                    record_rotation("deactivated");
                    info!(
                        channel_id = %integration.id,
                        tenant_id = %integration.tenant_id,
                        platform = %integration.platform,
                        "access token expired, integration moved to error"
                    );
                }
                Ok(())
            }
            TokenState::ExpiringSoon => {
                if integration.status == ChannelStatus::Error {
                    return Ok(());
                }
                if let Err(e) = validate_token(integration.platform, &integration.access_token) {
                    warn!(channel_id = %integration.id, error = %e, "stored access token looks malformed");
                }

                self.notifier
                    .token_expiring(&TokenExpiryWarning {
                        channel_id: integration.id.clone(),
                        tenant_id: integration.tenant_id.clone(),
                        platform: integration.platform,
                        token_expiry: integration.token_expiry.clone().unwrap_or_default(),
                        days_until_expiry: token.days_until_expiry.unwrap_or(0),
                        notify: self.config.notification_email.clone(),
                    })
                    .await?;
                report.warned += 1;
                record_rotation("warned");

                if self.config.auto_rotation {
                    self.rotate(integration, report).await?;
                }
                Ok(())
            }
            TokenState::Valid => Ok(()),
        }
    }

    async fn rotate(
        &self,
        integration: &ChannelIntegration,
        report: &mut ScanReport,
    ) -> Result<(), CourierError> {
        let Some(refresher) = self.refreshers.get(&integration.platform) else {
            debug!(platform = %integration.platform, "no token refresher for platform");
            return Ok(());
        };

        let refreshed = refresher.refresh(integration).await?;
        validate_token(integration.platform, &refreshed.access_token)?;
        self.registry
            .rotate_token(
                &integration.id,
                &refreshed.access_token,
                refreshed.token_expiry.as_deref(),
            )
            .await?;

        report.rotated += 1;
        record_rotation("rotated");
        info!(
            channel_id = %integration.id,
            platform = %integration.platform,
            token_expiry = refreshed.token_expiry.as_deref().unwrap_or("never"),
            "access token rotated"
        );
        Ok(())
    }

    /// Token health for one tenant, or for every integration when `tenant_id` is `None`.
    pub async fn token_statuses(&self, tenant_id: Option<&str>) -> Result<Vec<TokenStatus>, CourierError> {
        let records = match tenant_id {
            Some(tenant_id) => self.registry.get_by_tenant(tenant_id).await?,
            None => self.registry.list_all().await?,
        };
        let now = Utc::now();
        Ok(records
            .iter()
            .map(|record| TokenStatus::evaluate_record(record, now, self.config.warning_days))
            .collect())
    }
}
