// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry and message-log behaviour against a real SQLite file.

use courier_config::model::StorageConfig;
use courier_core::{
    ChannelRegistry, ChannelStatus, CourierError, MessageContent, MessageLog,
    NewChannelIntegration, OutboundStatus, Platform, Provider,
};
use courier_storage::SqliteStore;
use courier_vault::Vault;
use tempfile::TempDir;

async fn open_store() -> (SqliteStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("courier.db").to_string_lossy().into_owned(),
        wal_mode: true,
    };
    let store = SqliteStore::new(config, Vault::generate().unwrap());
    store.initialize().await.unwrap();
    (store, dir)
}

fn whatsapp(tenant: &str) -> NewChannelIntegration {
    NewChannelIntegration {
        tenant_id: tenant.to_string(),
        platform: Platform::WhatsApp,
        provider: Provider::Meta,
        access_token: "EAAG-abcdef123456".to_string(),
        webhook_url: Some("https://hooks.example.com/wa".to_string()),
        config: serde_json::json!({"phone_number_id": "1234567890"}),
        token_expiry: Some("2026-12-31T00:00:00Z".to_string()),
    }
}

#[tokio::test]
async fn create_then_get_returns_same_record() {
    let (store, _dir) = open_store().await;
    let created = store.create(whatsapp("tenant-a")).await.unwrap();

    assert_eq!(created.status, ChannelStatus::Active);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.token_expiry.as_deref(), Some("2026-12-31T00:00:00.000Z"));

    let fetched = store.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.access_token, "EAAG-abcdef123456");
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let (store, _dir) = open_store().await;
    let err = store.get_by_id("missing").await.unwrap_err();
    assert!(matches!(err, CourierError::NotFound { .. }));
}

#[tokio::test]
async fn update_nonexistent_is_not_found() {
    let (store, _dir) = open_store().await;
    let mut ghost = store.create(whatsapp("tenant-a")).await.unwrap();
    ghost.id = "does-not-exist".to_string();
    let err = store.update(&ghost).await.unwrap_err();
    assert!(matches!(err, CourierError::NotFound { .. }));
}

#[tokio::test]
async fn update_persists_full_row_and_stamps_updated_at() {
    let (store, _dir) = open_store().await;
    let mut integration = store.create(whatsapp("tenant-a")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    integration.access_token = "EAAG-rotated".to_string();
    integration.webhook_url = None;
    integration.status = ChannelStatus::Disabled;
    let updated = store.update(&integration).await.unwrap();
    assert!(updated.updated_at > integration.created_at);

    let fetched = store.get_by_id(&integration.id).await.unwrap();
    assert_eq!(fetched.access_token, "EAAG-rotated");
    assert_eq!(fetched.webhook_url, None);
    assert_eq!(fetched.status, ChannelStatus::Disabled);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (store, _dir) = open_store().await;
    let created = store.create(whatsapp("tenant-a")).await.unwrap();
    store.delete(&created.id).await.unwrap();

    assert!(matches!(
        store.get_by_id(&created.id).await,
        Err(CourierError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete(&created.id).await,
        Err(CourierError::NotFound { .. })
    ));
}

#[tokio::test]
async fn platform_lookup_returns_oldest_active() {
    let (store, _dir) = open_store().await;
    let first = store.create(whatsapp("tenant-a")).await.unwrap();
    let second = store.create(whatsapp("tenant-a")).await.unwrap();
    store.create(whatsapp("tenant-b")).await.unwrap();

    let found = store
        .get_by_platform_and_tenant(Platform::WhatsApp, "tenant-a")
        .await
        .unwrap();
    assert_eq!(found.id, first.id);

    store.set_status(&first.id, ChannelStatus::Disabled).await.unwrap();
    let found = store
        .get_by_platform_and_tenant(Platform::WhatsApp, "tenant-a")
        .await
        .unwrap();
    assert_eq!(found.id, second.id);

    assert!(matches!(
        store
            .get_by_platform_and_tenant(Platform::Telegram, "tenant-a")
            .await,
        Err(CourierError::NotFound { .. })
    ));
    assert_eq!(store.get_by_tenant("tenant-a").await.unwrap().len(), 2);
    assert!(store.get_by_tenant("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn set_status_is_conditional() {
    let (store, _dir) = open_store().await;
    let created = store.create(whatsapp("tenant-a")).await.unwrap();

    assert!(store.set_status(&created.id, ChannelStatus::Error).await.unwrap());
    assert!(!store.set_status(&created.id, ChannelStatus::Error).await.unwrap());
    assert!(matches!(
        store.set_status("nope", ChannelStatus::Error).await,
        Err(CourierError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_expiring_respects_cutoff() {
    let (store, _dir) = open_store().await;
    let mut soon = whatsapp("tenant-a");
    soon.token_expiry = Some("2026-03-02T00:00:00Z".to_string());
    let soon = store.create(soon).await.unwrap();

    store.create(whatsapp("tenant-a")).await.unwrap();

    let mut forever = whatsapp("tenant-a");
    forever.token_expiry = None;
    store.create(forever).await.unwrap();

    let expiring = store.list_expiring("2026-03-08T00:00:00.000Z").await.unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0].as_ref().unwrap().id, soon.id);
}

#[tokio::test]
async fn undecryptable_row_does_not_fail_the_listing() {
    let (store, dir) = open_store().await;
    let readable = store.create(whatsapp("tenant-a")).await.unwrap();

    let other_key = SqliteStore::new(
        StorageConfig {
            database_path: dir.path().join("courier.db").to_string_lossy().into_owned(),
            wal_mode: true,
        },
        Vault::generate().unwrap(),
    );
    other_key.initialize().await.unwrap();
    let foreign = other_key.create(whatsapp("tenant-a")).await.unwrap();

    let listed = store.get_by_tenant("tenant-a").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].as_ref().unwrap().id, readable.id);
    let unreadable = listed[1].as_ref().unwrap_err();
    assert_eq!(unreadable.id, foreign.id);
    assert_eq!(unreadable.status, ChannelStatus::Active);
    assert_eq!(unreadable.token_expiry, foreign.token_expiry);
    assert!(matches!(unreadable.error, CourierError::Decryption(_)));

    assert_eq!(store.list_all().await.unwrap().len(), 2);
    assert_eq!(
        store.list_expiring("2027-01-01T00:00:00.000Z").await.unwrap().len(),
        2
    );
    assert!(matches!(
        store.get_by_id(&foreign.id).await,
        Err(CourierError::Decryption(_))
    ));
}

#[tokio::test]
async fn rotate_token_replaces_credential() {
    let (store, _dir) = open_store().await;
    let created = store.create(whatsapp("tenant-a")).await.unwrap();

    store
        .rotate_token(&created.id, "EAAG-fresh", Some("2027-01-01T00:00:00Z"))
        .await
        .unwrap();

    let fetched = store.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.access_token, "EAAG-fresh");
    assert_eq!(fetched.token_expiry.as_deref(), Some("2027-01-01T00:00:00.000Z"));
    assert!(fetched.last_rotated.is_some());

    assert!(store.rotate_token("nope", "x", None).await.is_err());
}

#[tokio::test]
async fn inbound_rows_only_flip_processed() {
    let (store, _dir) = open_store().await;
    let first = store
        .record_inbound(Platform::Telegram, br#"{"update_id":1}"#)
        .await
        .unwrap();
    let second = store
        .record_inbound(Platform::Webchat, b"\x00raw bytes\xff")
        .await
        .unwrap();
    assert!(!first.processed);

    store.mark_processed(&first.id).await.unwrap();

    let pending = store.list_unprocessed(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);
    assert_eq!(pending[0].payload, b"\x00raw bytes\xff".to_vec());
    assert_eq!(pending[0].platform, Platform::Webchat);

    assert!(matches!(
        store.mark_processed("missing").await,
        Err(CourierError::NotFound { .. })
    ));
}

#[tokio::test]
async fn outbound_log_finalizes_exactly_once() {
    let (store, _dir) = open_store().await;
    let log = store
        .open_outbound("chan-1", "123", &MessageContent::text("hello"))
        .await
        .unwrap();
    assert_eq!(log.status, OutboundStatus::Queued);
    assert_eq!(log.content, serde_json::json!({"type": "text", "text": "hello"}));

    let response = serde_json::json!({"http_status": 200, "body": {"ok": true}});
    let sent = store
        .finalize_outbound(&log.id, OutboundStatus::Sent, &response)
        .await
        .unwrap();
    assert_eq!(sent.status, OutboundStatus::Sent);
    assert_eq!(sent.response, Some(response));

    let again = store
        .finalize_outbound(&log.id, OutboundStatus::Failed, &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(again, CourierError::InvalidRequest(_)));
    assert_eq!(
        store.get_outbound(&log.id).await.unwrap().status,
        OutboundStatus::Sent
    );

    assert!(matches!(
        store
            .finalize_outbound("missing", OutboundStatus::Sent, &serde_json::json!({}))
            .await,
        Err(CourierError::NotFound { .. })
    ));
}
