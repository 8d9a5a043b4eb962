// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-directory SQLite store for integration tests.

use std::sync::Arc;

use courier_config::model::StorageConfig;
use courier_core::{
    ChannelIntegration, ChannelRegistry, CourierError, NewChannelIntegration, Platform, Provider,
};
use courier_storage::SqliteStore;
use courier_vault::Vault;
use tempfile::TempDir;

/// A migrated store whose database lives as long as this value.
pub struct TestStore {
    pub store: Arc<SqliteStore>,
    config: StorageConfig,
    _dir: TempDir,
}

impl TestStore {
    pub async fn new() -> Result<Self, CourierError> {
        let dir = TempDir::new().map_err(CourierError::persistence)?;
        let config = StorageConfig {
            database_path: dir.path().join("courier.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let store = SqliteStore::new(config.clone(), Vault::generate()?);
        store.initialize().await?;
        Ok(Self {
            store: Arc::new(store),
            config,
            _dir: dir,
        })
    }

    /// A second store on the same database file with its own random key.
    /// Credentials it writes cannot be decrypted through [`TestStore::store`].
    pub async fn store_with_other_key(&self) -> Result<SqliteStore, CourierError> {
        let store = SqliteStore::new(self.config.clone(), Vault::generate()?);
        store.initialize().await?;
        Ok(store)
    }

    /// Register an active integration.
    pub async fn channel(
        &self,
        tenant_id: &str,
        platform: Platform,
        provider: Provider,
        access_token: &str,
        config: serde_json::Value,
    ) -> Result<ChannelIntegration, CourierError> {
        self.store
            .create(NewChannelIntegration {
                tenant_id: tenant_id.to_string(),
                platform,
                provider,
                access_token: access_token.to_string(),
                webhook_url: None,
                config,
                token_expiry: None,
            })
            .await
    }

    /// Register an integration whose token expires `days` from now (negative for the past).
    pub async fn expiring_channel(
        &self,
        tenant_id: &str,
        platform: Platform,
        days: i64,
    ) -> Result<ChannelIntegration, CourierError> {
        let expiry = chrono::Utc::now() + chrono::Duration::days(days);
        self.store
            .create(NewChannelIntegration {
                tenant_id: tenant_id.to_string(),
                platform,
                provider: Provider::Meta,
                access_token: "EAAG-expiring-token".to_string(),
                webhook_url: None,
                config: serde_json::json!({"phone_number_id": "106540352242922"}),
                token_expiry: Some(courier_core::types::format_timestamp(expiry)),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_usable_store() {
        let harness = TestStore::new().await.unwrap();
        let created = harness
            .channel("t", Platform::Telegram, Provider::Custom, "1:abc", serde_json::json!({}))
            .await
            .unwrap();
        let fetched = harness.store.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched.access_token, "1:abc");
    }

    #[tokio::test]
    async fn other_key_rows_are_unreadable() {
        let harness = TestStore::new().await.unwrap();
        let other = harness.store_with_other_key().await.unwrap();
        let created = other
            .create(NewChannelIntegration {
                tenant_id: "t".into(),
                platform: Platform::Telegram,
                provider: Provider::Custom,
                access_token: "1:abc".into(),
                webhook_url: None,
                config: serde_json::json!({}),
                token_expiry: None,
            })
            .await
            .unwrap();
        assert!(matches!(
            harness.store.get_by_id(&created.id).await,
            Err(CourierError::Decryption(_))
        ));
    }
}
