// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `courier serve` command implementation.
//!
//! Opens the credential store, builds the ingress pipeline, dispatcher, and
//! rotation scheduler, then serves HTTP until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use courier_config::model::{CourierConfig, WebhookSecretConfig};
use courier_core::{CourierError, Platform, PluginAdapter, ServiceClock};
use courier_dispatch::Dispatcher;
use courier_gateway::{
    start_server, AuthConfig, GatewayState, HealthState, HttpForwarder, PlatformSecrets,
    ServerConfig, WebhookIngress, WebhookSecrets,
};
use courier_prometheus::PrometheusAdapter;
use courier_scheduler::{LogNotifier, MetaTokenRefresher, TokenRotationScheduler};
use tracing::{info, warn};

use crate::commands::open_store;
use crate::shutdown;

pub async fn run_serve(config: CourierConfig) -> Result<(), CourierError> {
    init_tracing(&config.server.log_level);
    info!("starting courier serve");

    let clock = ServiceClock::start();
    let store = open_store(&config).await?;
    info!(path = %config.storage.database_path, "channel store ready");

    let prometheus = match PrometheusAdapter::new() {
        Ok(adapter) => Some(Arc::new(adapter)),
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            None
        }
    };

    let forwarder = Arc::new(HttpForwarder::new(
        &config.messaging.service_url,
        Duration::from_secs(config.messaging.timeout_secs),
    )?);
    info!(url = forwarder.url(), "forwarding inbound messages");

    let secrets = webhook_secrets(&config);
    let ingress = WebhookIngress::new(secrets, store.clone(), forwarder.clone());
    for platform in ingress.unauthenticated_platforms() {
        warn!(%platform, "webhooks accepted without authentication; set a secret_token");
    }
    for platform in ingress.unconfigured_platforms() {
        warn!(%platform, "no webhook secret configured; every delivery will be rejected");
    }

    let dispatcher = Dispatcher::new(store.clone(), store.clone(), &config.dispatch)?;
    let rotation = Arc::new(rotation_scheduler(&config, store.clone())?);

    if config.server.bearer_token.is_none() {
        warn!("server.bearer_token is not set; the /v1 API will reject every request");
    }

    let mut adapters: Vec<Arc<dyn PluginAdapter>> = vec![store.clone(), forwarder];
    let prometheus_render = prometheus.map(|adapter| {
        adapters.push(adapter.clone());
        Arc::new(move || adapter.render()) as Arc<dyn Fn() -> String + Send + Sync>
    });

    let state = GatewayState {
        ingress: Arc::new(ingress),
        dispatcher: Arc::new(dispatcher),
        rotation: rotation.clone(),
        auth: AuthConfig {
            bearer_token: config.server.bearer_token.clone(),
        },
        health: HealthState {
            clock,
            adapters: adapters.clone(),
            prometheus_render,
        },
    };

    let cancel = shutdown::install_signal_handler();

    let rotation_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { rotation.run(cancel).await })
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let served = start_server(&server_config, state, cancel.clone()).await;

    // A bind failure returns before any signal; stop the scheduler too.
    cancel.cancel();
    if let Err(e) = rotation_task.await {
        warn!(error = %e, "rotation task ended abnormally");
    }

    for adapter in &adapters {
        if let Err(e) = adapter.shutdown().await {
            warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
        }
    }

    info!("courier stopped");
    served
}

fn platform_secrets(config: &WebhookSecretConfig) -> PlatformSecrets {
    PlatformSecrets {
        secret: config.secret.clone(),
        verify_token: config.verify_token.clone(),
        secret_token: config.secret_token.clone(),
    }
}

fn webhook_secrets(config: &CourierConfig) -> WebhookSecrets {
    let webhooks = &config.webhooks;
    WebhookSecrets::new()
        .with(Platform::WhatsApp, platform_secrets(&webhooks.whatsapp))
        .with(Platform::Messenger, platform_secrets(&webhooks.messenger))
        .with(Platform::Instagram, platform_secrets(&webhooks.instagram))
        .with(Platform::Telegram, platform_secrets(&webhooks.telegram))
        .with(Platform::Webchat, platform_secrets(&webhooks.webchat))
        .with(Platform::Mailchimp, platform_secrets(&webhooks.mailchimp))
}

/// Rotation scheduler with a Meta token exchange for the Graph API platforms
/// when app credentials are configured.
fn rotation_scheduler(
    config: &CourierConfig,
    store: Arc<courier_storage::SqliteStore>,
) -> Result<TokenRotationScheduler, CourierError> {
    let rotation = &config.rotation;
    let mut scheduler =
        TokenRotationScheduler::new(store, Arc::new(LogNotifier), rotation.clone());

    match (&rotation.meta_app_id, &rotation.meta_app_secret) {
        (Some(app_id), Some(app_secret)) => {
            let client = courier_dispatch::transports::http_client(&config.dispatch)?;
            let refresher = Arc::new(MetaTokenRefresher::new(
                client,
                &config.dispatch.graph_api_base,
                app_id.clone(),
                app_secret.clone(),
            ));
            for platform in [Platform::WhatsApp, Platform::Messenger, Platform::Instagram] {
                scheduler = scheduler.with_refresher(platform, refresher.clone());
            }
        }
        _ if rotation.auto_rotation => {
            warn!("rotation.auto_rotation is on but no meta app credentials are set; tokens will only be reported");
        }
        _ => {}
    }

    info!(
        enabled = rotation.enabled,
        interval_secs = rotation.interval_secs,
        warning_days = rotation.warning_days,
        auto_rotation = rotation.auto_rotation,
        "token rotation configured"
    );
    Ok(scheduler)
}

/// Tracing subscriber with `courier={log_level},warn`, overridable by `RUST_LOG`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("courier={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
