// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Courier gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Courier configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// HTTP listener and API authentication.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Per-platform webhook secrets and verification tokens.
    #[serde(default)]
    pub webhooks: WebhooksConfig,

    /// Downstream messaging service that receives normalized messages.
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Outbound provider API settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Token rotation policy.
    #[serde(default)]
    pub rotation: RotationConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token guarding the `/v1` API. `None` rejects every `/v1` request.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("courier").join("courier.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("courier.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_true() -> bool {
    true
}

/// Credential vault configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// 32-byte AES-256 key. Raw bytes, or `base64:<encoded>`.
    /// Prefer `COURIER_VAULT_ENCRYPTION_KEY` over writing this to disk.
    #[serde(default)]
    pub encryption_key: Option<String>,
}

/// Webhook authentication settings for every inbound platform.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhooksConfig {
    #[serde(default)]
    pub whatsapp: WebhookSecretConfig,
    #[serde(default)]
    pub messenger: WebhookSecretConfig,
    #[serde(default)]
    pub instagram: WebhookSecretConfig,
    #[serde(default)]
    pub telegram: WebhookSecretConfig,
    #[serde(default)]
    pub webchat: WebhookSecretConfig,
    #[serde(default)]
    pub mailchimp: WebhookSecretConfig,
}

/// Secrets for one platform's webhook endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSecretConfig {
    /// HMAC-SHA256 shared secret used to sign request bodies.
    #[serde(default)]
    pub secret: Option<String>,

    /// Token echoed back during the Meta `hub.verify_token` handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Telegram `secret_token` compared against `X-Telegram-Bot-Api-Secret-Token`.
    #[serde(default)]
    pub secret_token: Option<String>,
}

/// Downstream messaging service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    /// Base URL; normalized messages go to `{service_url}/api/v1/webhooks/inbound`.
    #[serde(default = "default_messaging_url")]
    pub service_url: String,

    #[serde(default = "default_forward_timeout")]
    pub timeout_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            service_url: default_messaging_url(),
            timeout_secs: default_forward_timeout(),
        }
    }
}

fn default_messaging_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_forward_timeout() -> u64 {
    10
}

/// Outbound provider API configuration.
///
/// Base URLs are overridable so sends can be pointed at sandboxes or proxies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Per-request timeout for provider calls.
    #[serde(default = "default_dispatch_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,

    #[serde(default = "default_dialog360_base")]
    pub dialog360_base: String,

    #[serde(default = "default_twilio_base")]
    pub twilio_base: String,

    #[serde(default = "default_telegram_base")]
    pub telegram_base: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_dispatch_timeout(),
            graph_api_base: default_graph_api_base(),
            dialog360_base: default_dialog360_base(),
            twilio_base: default_twilio_base(),
            telegram_base: default_telegram_base(),
        }
    }
}

fn default_dispatch_timeout() -> u64 {
    15
}

fn default_graph_api_base() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

fn default_dialog360_base() -> String {
    "https://waba.360dialog.io".to_string()
}

fn default_twilio_base() -> String {
    "https://api.twilio.com".to_string()
}

fn default_telegram_base() -> String {
    "https://api.telegram.org".to_string()
}

/// Token rotation scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RotationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between scans.
    #[serde(default = "default_rotation_interval")]
    pub interval_secs: u64,

    /// Tokens expiring within this many days trigger a warning.
    #[serde(default = "default_warning_days")]
    pub warning_days: u32,

    /// Attempt to refresh expiring tokens automatically.
    #[serde(default)]
    pub auto_rotation: bool,

    /// Contact included in expiry notifications.
    #[serde(default)]
    pub notification_email: Option<String>,

    /// Meta app credentials for the long-lived token exchange.
    #[serde(default)]
    pub meta_app_id: Option<String>,

    #[serde(default)]
    pub meta_app_secret: Option<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_rotation_interval(),
            warning_days: default_warning_days(),
            auto_rotation: false,
            notification_email: None,
            meta_app_id: None,
            meta_app_secret: None,
        }
    }
}

fn default_rotation_interval() -> u64 {
    3600
}

fn default_warning_days() -> u32 {
    7
}
