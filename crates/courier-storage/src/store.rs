// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the registry and message-log traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use courier_config::model::StorageConfig;
use courier_core::types::{format_timestamp, now_timestamp, parse_timestamp};
use courier_core::{
    AdapterType, ChannelIntegration, ChannelRecord, ChannelRegistry, ChannelStatus, CourierError,
    HealthStatus, InboundMessage, MessageContent, MessageLog, NewChannelIntegration,
    OutboundMessageLog, OutboundStatus, Platform, PluginAdapter,
};
use courier_vault::Vault;

use crate::database::{Database, map_tr_err};
use crate::models::ChannelRow;
use crate::queries;
use crate::queries::channels::StatusChange;

/// SQLite-backed store for channel integrations and audit logs.
///
/// Every credential passes through the [`Vault`] on its way in and out. The
/// database opens lazily on [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    vault: Vault,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig, vault: Vault) -> Self {
        Self {
            config,
            vault,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already-open database.
    pub fn with_database(db: Database, vault: Vault) -> Self {
        Self {
            config: StorageConfig::default(),
            vault,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// Open the database file and run migrations.
    pub async fn initialize(&self) -> Result<(), CourierError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| CourierError::Internal("storage already initialized".to_string()))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, CourierError> {
        self.db.get().ok_or_else(|| {
            CourierError::Internal("storage not initialized -- call initialize() first".to_string())
        })
    }

    fn open_rows(&self, rows: Vec<ChannelRow>) -> Vec<ChannelRecord> {
        rows.into_iter().map(|row| row.open_record(&self.vault)).collect()
    }
}

/// Rewrite an RFC 3339 expiry into the canonical storage format so that
/// expiry comparisons can run in SQL.
fn canonical_expiry(expiry: Option<&str>) -> Result<Option<String>, CourierError> {
    expiry
        .map(|raw| {
            parse_timestamp(raw).map(format_timestamp).ok_or_else(|| {
                CourierError::InvalidRequest(format!("token_expiry `{raw}` is not an RFC 3339 timestamp"))
            })
        })
        .transpose()
}

#[async_trait]
impl ChannelRegistry for SqliteStore {
    async fn create(&self, new: NewChannelIntegration) -> Result<ChannelIntegration, CourierError> {
        let now = now_timestamp();
        let integration = ChannelIntegration {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: new.tenant_id,
            platform: new.platform,
            provider: new.provider,
            access_token: new.access_token,
            webhook_url: new.webhook_url,
            status: ChannelStatus::Active,
            config: if new.config.is_null() {
                serde_json::json!({})
            } else {
                new.config
            },
            token_expiry: canonical_expiry(new.token_expiry.as_deref())?,
            last_rotated: None,
            created_at: now.clone(),
            updated_at: now,
        };
        queries::channels::insert(self.db()?, ChannelRow::seal(&integration, &self.vault)?).await?;
        Ok(integration)
    }

    async fn get_by_id(&self, id: &str) -> Result<ChannelIntegration, CourierError> {
        queries::channels::get(self.db()?, id)
            .await?
            .ok_or_else(|| CourierError::not_found("channel integration", id))?
            .open(&self.vault)
    }

    async fn list_all(&self) -> Result<Vec<ChannelRecord>, CourierError> {
        let rows = queries::channels::list_all(self.db()?).await?;
        Ok(self.open_rows(rows))
    }

    async fn get_by_tenant(&self, tenant_id: &str) -> Result<Vec<ChannelRecord>, CourierError> {
        let rows = queries::channels::list_by_tenant(self.db()?, tenant_id).await?;
        Ok(self.open_rows(rows))
    }

    async fn get_by_platform_and_tenant(
        &self,
        platform: Platform,
        tenant_id: &str,
    ) -> Result<ChannelIntegration, CourierError> {
        queries::channels::first_active(self.db()?, platform, tenant_id)
            .await?
            .ok_or_else(|| {
                CourierError::not_found("channel integration", format!("{platform}/{tenant_id}"))
            })?
            .open(&self.vault)
    }

    async fn update(&self, integration: &ChannelIntegration) -> Result<ChannelIntegration, CourierError> {
        let mut updated = integration.clone();
        updated.token_expiry = canonical_expiry(integration.token_expiry.as_deref())?;
        updated.updated_at = now_timestamp();

        let affected =
            queries::channels::update(self.db()?, ChannelRow::seal(&updated, &self.vault)?).await?;
        if affected == 0 {
            return Err(CourierError::not_found("channel integration", &integration.id));
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), CourierError> {
        match queries::channels::delete(self.db()?, id).await? {
            0 => Err(CourierError::not_found("channel integration", id)),
            _ => Ok(()),
        }
    }

    async fn list_expiring(&self, cutoff: &str) -> Result<Vec<ChannelRecord>, CourierError> {
        let rows = queries::channels::list_expiring(self.db()?, cutoff).await?;
        Ok(self.open_rows(rows))
    }

    async fn set_status(&self, id: &str, status: ChannelStatus) -> Result<bool, CourierError> {
        match queries::channels::set_status(self.db()?, id, status, &now_timestamp()).await? {
            StatusChange::Changed => Ok(true),
            StatusChange::Unchanged => Ok(false),
            StatusChange::Missing => Err(CourierError::not_found("channel integration", id)),
        }
    }

    async fn rotate_token(
        &self,
        id: &str,
        access_token: &str,
        token_expiry: Option<&str>,
    ) -> Result<(), CourierError> {
        let sealed = self.vault.encrypt(access_token)?;
        let expiry = canonical_expiry(token_expiry)?;
        let affected =
            queries::channels::rotate_token(self.db()?, id, sealed, expiry, &now_timestamp()).await?;
        if affected == 0 {
            return Err(CourierError::not_found("channel integration", id));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageLog for SqliteStore {
    async fn record_inbound(
        &self,
        platform: Platform,
        payload: &[u8],
    ) -> Result<InboundMessage, CourierError> {
        let message = InboundMessage {
            id: uuid::Uuid::new_v4().to_string(),
            platform,
            payload: payload.to_vec(),
            received_at: now_timestamp(),
            processed: false,
        };
        queries::inbound::insert(self.db()?, message.clone()).await?;
        Ok(message)
    }

    async fn mark_processed(&self, id: &str) -> Result<(), CourierError> {
        match queries::inbound::mark_processed(self.db()?, id).await? {
            0 => Err(CourierError::not_found("inbound message", id)),
            _ => Ok(()),
        }
    }

    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<InboundMessage>, CourierError> {
        queries::inbound::list_unprocessed(self.db()?, limit).await
    }

    async fn open_outbound(
        &self,
        channel_id: &str,
        recipient: &str,
        content: &MessageContent,
    ) -> Result<OutboundMessageLog, CourierError> {
        let content = serde_json::to_value(content)
            .map_err(|e| CourierError::Internal(format!("failed to encode message content: {e}")))?;
        let log = OutboundMessageLog {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.to_string(),
            recipient: recipient.to_string(),
            content,
            status: OutboundStatus::Queued,
            response: None,
            timestamp: now_timestamp(),
        };
        queries::outbound::insert(self.db()?, log.clone()).await?;
        Ok(log)
    }

    async fn finalize_outbound(
        &self,
        id: &str,
        status: OutboundStatus,
        response: &serde_json::Value,
    ) -> Result<OutboundMessageLog, CourierError> {
        if !status.is_terminal() {
            return Err(CourierError::InvalidRequest(format!(
                "outbound log can only be finalized as sent or failed, not {status}"
            )));
        }

        let db = self.db()?;
        let affected = queries::outbound::finalize(db, id, status, response).await?;
        let log = queries::outbound::get(db, id)
            .await?
            .ok_or_else(|| CourierError::not_found("outbound message log", id))?;
        if affected == 0 {
            return Err(CourierError::InvalidRequest(format!(
                "outbound message log {id} is already {}",
                log.status
            )));
        }
        Ok(log)
    }

    async fn get_outbound(&self, id: &str) -> Result<OutboundMessageLog, CourierError> {
        queries::outbound::get(self.db()?, id)
            .await?
            .ok_or_else(|| CourierError::not_found("outbound message log", id))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CourierError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".to_string()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), CourierError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::Provider;

    async fn store() -> SqliteStore {
        let db = Database::open_in_memory().await.unwrap();
        SqliteStore::with_database(db, Vault::generate().unwrap())
    }

    #[test]
    fn canonical_expiry_normalizes_offsets() {
        assert_eq!(
            canonical_expiry(Some("2026-05-01T12:00:00+02:00")).unwrap(),
            Some("2026-05-01T10:00:00.000Z".to_string())
        );
        assert_eq!(canonical_expiry(None).unwrap(), None);
        assert!(matches!(
            canonical_expiry(Some("soon")),
            Err(CourierError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn token_is_sealed_at_rest() {
        let store = store().await;
        let created = store
            .create(NewChannelIntegration {
                tenant_id: "t1".into(),
                platform: Platform::Telegram,
                provider: Provider::Custom,
                access_token: "123456:plain-bot-token".into(),
                webhook_url: None,
                config: serde_json::Value::Null,
                token_expiry: None,
            })
            .await
            .unwrap();

        let row = queries::channels::get(store.db().unwrap(), &created.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(row.sealed_token, "123456:plain-bot-token");
        assert!(Vault::is_encrypted(&row.sealed_token));
        assert_eq!(row.config, serde_json::json!({}));
    }

    #[tokio::test]
    async fn wrong_vault_key_fails_reads() {
        let db = Database::open_in_memory().await.unwrap();
        let store = SqliteStore::with_database(db, Vault::generate().unwrap());
        let created = store
            .create(NewChannelIntegration {
                tenant_id: "t1".into(),
                platform: Platform::WhatsApp,
                provider: Provider::Meta,
                access_token: "EAAG-token".into(),
                webhook_url: None,
                config: serde_json::json!({"phone_number_id": "111"}),
                token_expiry: None,
            })
            .await
            .unwrap();

        let row = queries::channels::get(store.db().unwrap(), &created.id)
            .await
            .unwrap()
            .unwrap();
        let err = row.open(&Vault::generate().unwrap()).unwrap_err();
        assert!(matches!(err, CourierError::Decryption(_)));
    }

    #[tokio::test]
    async fn uninitialized_store_reports_unhealthy() {
        let store = SqliteStore::new(StorageConfig::default(), Vault::generate().unwrap());
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        assert!(store.get_by_id("x").await.is_err());
    }
}
