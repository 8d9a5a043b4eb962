// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./courier.toml` > `~/.config/courier/courier.toml` > `/etc/courier/courier.toml`
//! with environment variable overrides via `COURIER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CourierConfig;

/// Top-level sections, in the order they are matched against env var names.
const SECTIONS: &[&str] = &[
    "server",
    "storage",
    "vault",
    "webhooks",
    "messaging",
    "dispatch",
    "rotation",
];

/// Platforms nested under `[webhooks]`.
const WEBHOOK_PLATFORMS: &[&str] = &[
    "whatsapp",
    "messenger",
    "instagram",
    "telegram",
    "webchat",
    "mailchimp",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/courier/courier.toml` (system-wide)
/// 3. `~/.config/courier/courier.toml` (user XDG config)
/// 4. `./courier.toml` (local directory)
/// 5. `COURIER_*` environment variables
pub fn load_config() -> Result<CourierConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::file("/etc/courier/courier.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("courier/courier.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("courier.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `COURIER_VAULT_ENCRYPTION_KEY` must map to
/// `vault.encryption_key`, not `vault.encryption.key`.
fn env_provider() -> Env {
    Env::prefixed("COURIER_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
///
/// `webhooks_whatsapp_verify_token` becomes `webhooks.whatsapp.verify_token`.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) else {
            continue;
        };
        if *section == "webhooks" {
            for platform in WEBHOOK_PLATFORMS {
                if let Some(field) = rest.strip_prefix(platform).and_then(|r| r.strip_prefix('_')) {
                    return format!("webhooks.{platform}.{field}");
                }
            }
        }
        return format!("{section}.{rest}");
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("server_bearer_token"), "server.bearer_token");
        assert_eq!(map_env_key("vault_encryption_key"), "vault.encryption_key");
        assert_eq!(map_env_key("rotation_warning_days"), "rotation.warning_days");
        assert_eq!(map_env_key("dispatch_graph_api_base"), "dispatch.graph_api_base");
    }

    #[test]
    fn webhook_env_keys_map_to_platform_tables() {
        assert_eq!(
            map_env_key("webhooks_whatsapp_verify_token"),
            "webhooks.whatsapp.verify_token"
        );
        assert_eq!(
            map_env_key("webhooks_telegram_secret_token"),
            "webhooks.telegram.secret_token"
        );
        assert_eq!(map_env_key("webhooks_mailchimp_secret"), "webhooks.mailchimp.secret");
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(map_env_key("serverless"), "serverless");
        assert_eq!(map_env_key("other"), "other");
    }
}
