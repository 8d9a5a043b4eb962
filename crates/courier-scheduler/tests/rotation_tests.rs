// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rotation scans against a real SQLite registry with recording collaborators.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use courier_config::model::RotationConfig;
use courier_core::types::format_timestamp;
use courier_core::{
    ChannelRegistry, ChannelStatus, NewChannelIntegration, Platform, Provider, TokenState,
};
use courier_scheduler::{ScanReport, TokenRotationScheduler};
use courier_test_utils::{MockNotifier, MockRefresher, TestStore};
use tokio_util::sync::CancellationToken;

fn rotation(warning_days: u32, auto_rotation: bool) -> RotationConfig {
    RotationConfig {
        warning_days,
        auto_rotation,
        interval_secs: 3600,
        notification_email: Some("ops@example.com".to_string()),
        ..RotationConfig::default()
    }
}

#[tokio::test]
async fn expiring_soon_is_warned_not_deactivated() {
    let harness = TestStore::new().await.unwrap();
    let channel = harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 2)
        .await
        .unwrap();
    let notifier = MockNotifier::new();
    let scheduler =
        TokenRotationScheduler::new(harness.store.clone(), Arc::new(notifier.clone()), rotation(7, false));

    let report = scheduler.scan().await.unwrap();
    assert_eq!(
        report,
        ScanReport {
            scanned: 1,
            warned: 1,
            ..ScanReport::default()
        }
    );

    let after = harness.store.get_by_id(&channel.id).await.unwrap();
    assert_eq!(after.status, ChannelStatus::Active);
    assert_eq!(after.access_token, channel.access_token);
    assert_eq!(after.token_expiry, channel.token_expiry);
    assert!(after.last_rotated.is_none());

    let warnings = notifier.warnings().await;
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].channel_id, channel.id);
    assert_eq!(warnings[0].days_until_expiry, 1);
    assert_eq!(warnings[0].notify.as_deref(), Some("ops@example.com"));
}

#[tokio::test]
async fn expired_moves_to_error_once() {
    let harness = TestStore::new().await.unwrap();
    let channel = harness
        .expiring_channel("tenant-a", Platform::Messenger, -1)
        .await
        .unwrap();
    let notifier = MockNotifier::new();
    let scheduler =
        TokenRotationScheduler::new(harness.store.clone(), Arc::new(notifier.clone()), rotation(7, false));

    let first = scheduler.scan().await.unwrap();
    assert_eq!(first.deactivated, 1);
    assert_eq!(
        harness.store.get_by_id(&channel.id).await.unwrap().status,
        ChannelStatus::Error
    );
    let updated_at = harness.store.get_by_id(&channel.id).await.unwrap().updated_at;

    let second = scheduler.scan().await.unwrap();
    assert_eq!(second.scanned, 1);
    assert_eq!(second.deactivated, 0);
    assert_eq!(
        harness.store.get_by_id(&channel.id).await.unwrap().updated_at,
        updated_at
    );
    assert!(notifier.warnings().await.is_empty());
}

#[tokio::test]
async fn tokens_outside_window_are_ignored() {
    let harness = TestStore::new().await.unwrap();
    harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 30)
        .await
        .unwrap();
    let notifier = MockNotifier::new();
    let scheduler =
        TokenRotationScheduler::new(harness.store.clone(), Arc::new(notifier.clone()), rotation(7, false));

    assert_eq!(scheduler.scan().await.unwrap(), ScanReport::default());
    assert!(notifier.warnings().await.is_empty());
}

#[tokio::test]
async fn auto_rotation_persists_new_token() {
    let harness = TestStore::new().await.unwrap();
    let channel = harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 3)
        .await
        .unwrap();
    let new_expiry = format_timestamp(Utc::now() + chrono::Duration::days(60));
    let refresher = MockRefresher::new("EAAG-rotated-token", Some(&new_expiry));
    let scheduler = TokenRotationScheduler::new(
        harness.store.clone(),
        Arc::new(MockNotifier::new()),
        rotation(7, true),
    )
    .with_refresher(Platform::WhatsApp, Arc::new(refresher.clone()));

    let report = scheduler.scan().await.unwrap();
    assert_eq!(report.rotated, 1);
    assert_eq!(refresher.calls().await, vec![channel.id.clone()]);

    let after = harness.store.get_by_id(&channel.id).await.unwrap();
    assert_eq!(after.access_token, "EAAG-rotated-token");
    assert_eq!(after.token_expiry.as_deref(), Some(new_expiry.as_str()));
    assert!(after.last_rotated.is_some());
    assert_eq!(after.status, ChannelStatus::Active);
}

#[tokio::test]
async fn one_failed_refresh_does_not_stop_the_scan() {
    let harness = TestStore::new().await.unwrap();
    let failing = harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 1)
        .await
        .unwrap();
    let healthy = harness
        .expiring_channel("tenant-b", Platform::WhatsApp, 2)
        .await
        .unwrap();
    let refresher = MockRefresher::new("EAAG-fresh", None).failing_for(&[failing.id.as_str()]);
    let scheduler = TokenRotationScheduler::new(
        harness.store.clone(),
        Arc::new(MockNotifier::new()),
        rotation(7, true),
    )
    .with_refresher(Platform::WhatsApp, Arc::new(refresher.clone()));

    let report = scheduler.scan().await.unwrap();
    assert_eq!(report.scanned, 2);
    assert_eq!(report.warned, 2);
    assert_eq!(report.rotated, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(refresher.calls().await.len(), 2);

    assert_eq!(
        harness.store.get_by_id(&failing.id).await.unwrap().access_token,
        failing.access_token
    );
    assert_eq!(
        harness.store.get_by_id(&healthy.id).await.unwrap().access_token,
        "EAAG-fresh"
    );
}

#[tokio::test]
async fn malformed_refreshed_token_is_not_stored() {
    let harness = TestStore::new().await.unwrap();
    let channel = harness
        .expiring_channel("tenant-a", Platform::Instagram, 2)
        .await
        .unwrap();
    let scheduler = TokenRotationScheduler::new(
        harness.store.clone(),
        Arc::new(MockNotifier::new()),
        rotation(7, true),
    )
    .with_refresher(Platform::Instagram, Arc::new(MockRefresher::new("   ", None)));

    let report = scheduler.scan().await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.rotated, 0);
    assert_eq!(
        harness.store.get_by_id(&channel.id).await.unwrap().access_token,
        channel.access_token
    );
}

fn sealed_elsewhere(tenant: &str, days: i64) -> NewChannelIntegration {
    NewChannelIntegration {
        tenant_id: tenant.to_string(),
        platform: Platform::WhatsApp,
        provider: Provider::Meta,
        access_token: "EAAG-other-key".to_string(),
        webhook_url: None,
        config: serde_json::json!({}),
        token_expiry: Some(format_timestamp(Utc::now() + chrono::Duration::days(days))),
    }
}

#[tokio::test]
async fn undecryptable_token_does_not_abort_the_scan() {
    let harness = TestStore::new().await.unwrap();
    let healthy = harness
        .expiring_channel("tenant-a", Platform::Messenger, -1)
        .await
        .unwrap();
    let other_key = harness.store_with_other_key().await.unwrap();
    let expired = other_key.create(sealed_elsewhere("tenant-a", -1)).await.unwrap();
    let expiring = other_key.create(sealed_elsewhere("tenant-b", 2)).await.unwrap();

    let notifier = MockNotifier::new();
    let scheduler =
        TokenRotationScheduler::new(harness.store.clone(), Arc::new(notifier.clone()), rotation(7, false));

    let report = scheduler.scan().await.unwrap();
    assert_eq!(
        report,
        ScanReport {
            scanned: 3,
            deactivated: 2,
            failed: 2,
            ..ScanReport::default()
        }
    );
    assert_eq!(
        harness.store.get_by_id(&healthy.id).await.unwrap().status,
        ChannelStatus::Error
    );
    assert_eq!(other_key.get_by_id(&expired.id).await.unwrap().status, ChannelStatus::Error);
    assert_eq!(other_key.get_by_id(&expiring.id).await.unwrap().status, ChannelStatus::Active);
    assert!(notifier.warnings().await.is_empty());

    let statuses = scheduler.token_statuses(Some("tenant-a")).await.unwrap();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s.status == TokenState::Expired));
    assert_eq!(scheduler.token_statuses(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn token_statuses_by_tenant() {
    let harness = TestStore::new().await.unwrap();
    harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 3)
        .await
        .unwrap();
    harness
        .expiring_channel("tenant-a", Platform::Messenger, -2)
        .await
        .unwrap();
    harness
        .channel(
            "tenant-a",
            Platform::Telegram,
            courier_core::Provider::Custom,
            "123:abc",
            serde_json::json!({}),
        )
        .await
        .unwrap();
    harness
        .expiring_channel("tenant-b", Platform::WhatsApp, 40)
        .await
        .unwrap();

    let scheduler = TokenRotationScheduler::new(
        harness.store.clone(),
        Arc::new(MockNotifier::new()),
        rotation(7, false),
    );

    let mut states: Vec<TokenState> = scheduler
        .token_statuses(Some("tenant-a"))
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.status)
        .collect();
    states.sort_by_key(|s| s.to_string());
    assert_eq!(
        states,
        vec![TokenState::Expired, TokenState::ExpiringSoon, TokenState::Valid]
    );

    assert_eq!(scheduler.token_statuses(None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn run_scans_immediately_and_stops_on_cancel() {
    let harness = TestStore::new().await.unwrap();
    harness
        .expiring_channel("tenant-a", Platform::WhatsApp, 2)
        .await
        .unwrap();
    let notifier = MockNotifier::new();
    let scheduler = Arc::new(TokenRotationScheduler::new(
        harness.store.clone(),
        Arc::new(notifier.clone()),
        rotation(7, false),
    ));

    let cancel = CancellationToken::new();
    let task = {
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { scheduler.run(cancel).await })
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        while notifier.warnings().await.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn disabled_scheduler_returns_at_once() {
    let harness = TestStore::new().await.unwrap();
    let config = RotationConfig {
        enabled: false,
        ..RotationConfig::default()
    };
    let scheduler = TokenRotationScheduler::new(harness.store.clone(), Arc::new(MockNotifier::new()), config);
    tokio::time::timeout(Duration::from_secs(1), scheduler.run(CancellationToken::new()))
        .await
        .unwrap();
}
