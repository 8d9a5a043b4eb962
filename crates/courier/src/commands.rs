// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `courier config print` and `courier tokens`.

use std::sync::Arc;

use courier_config::model::{CourierConfig, WebhookSecretConfig};
use courier_core::CourierError;
use courier_scheduler::{LogNotifier, TokenRotationScheduler};
use courier_storage::SqliteStore;
use courier_vault::{mask_secret, Vault};

/// Build the credential vault from `vault.encryption_key`.
pub(crate) fn vault_from_config(config: &CourierConfig) -> Result<Vault, CourierError> {
    let material = config.vault.encryption_key.as_deref().ok_or_else(|| {
        CourierError::Config(
            "vault.encryption_key is not set (use COURIER_VAULT_ENCRYPTION_KEY)".to_string(),
        )
    })?;
    Vault::from_key_material(material)
}

/// Open and migrate the configured database.
pub(crate) async fn open_store(config: &CourierConfig) -> Result<Arc<SqliteStore>, CourierError> {
    let store = SqliteStore::new(config.storage.clone(), vault_from_config(config)?);
    store.initialize().await?;
    Ok(Arc::new(store))
}

fn mask(value: &mut Option<String>) {
    if let Some(secret) = value.as_mut() {
        *secret = mask_secret(secret);
    }
}

fn mask_webhook(webhook: &mut WebhookSecretConfig) {
    mask(&mut webhook.secret);
    mask(&mut webhook.verify_token);
    mask(&mut webhook.secret_token);
}

/// Effective configuration as TOML with every secret masked.
pub fn render_config(config: &CourierConfig) -> Result<String, CourierError> {
    let mut masked = config.clone();
    mask(&mut masked.server.bearer_token);
    mask(&mut masked.vault.encryption_key);
    mask(&mut masked.rotation.meta_app_secret);
    let webhooks = &mut masked.webhooks;
    for webhook in [
        &mut webhooks.whatsapp,
        &mut webhooks.messenger,
        &mut webhooks.instagram,
        &mut webhooks.telegram,
        &mut webhooks.webchat,
        &mut webhooks.mailchimp,
    ] {
        mask_webhook(webhook);
    }

    toml::to_string_pretty(&masked)
        .map_err(|e| CourierError::Internal(format!("failed to render configuration: {e}")))
}

/// Print one line per integration with its token state.
pub async fn print_token_report(
    config: &CourierConfig,
    tenant_id: Option<&str>,
) -> Result<(), CourierError> {
    let store = open_store(config).await?;
    let scheduler = TokenRotationScheduler::new(
        store,
        Arc::new(LogNotifier),
        config.rotation.clone(),
    );
    let statuses = scheduler.token_statuses(tenant_id).await?;

    if statuses.is_empty() {
        println!("no channel integrations found");
        return Ok(());
    }

    println!(
        "{:<38} {:<10} {:<16} {:<14} {:>6}  {}",
        "CHANNEL", "PLATFORM", "TENANT", "STATUS", "DAYS", "EXPIRES"
    );
    for status in statuses {
        println!(
            "{:<38} {:<10} {:<16} {:<14} {:>6}  {}",
            status.channel_id,
            status.platform.to_string(),
            status.tenant_id,
            status.status.to_string(),
            status
                .days_until_expiry
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status.token_expiry.as_deref().unwrap_or("never"),
        );
    }
    Ok(())
}
