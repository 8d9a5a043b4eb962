// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: bind addresses, URL
//! schemes, timeout bounds, and rotation policy.

use crate::diagnostic::ConfigError;
use crate::model::CourierConfig;

/// Provider and forwarding timeouts must stay bounded so a slow remote
/// cannot stall a request indefinitely.
const MAX_TIMEOUT_SECS: u64 = 120;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if let Some(token) = &config.server.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "server.bearer_token must not be empty when set",
        ));
    }

    if !matches!(
        config.server.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ConfigError::validation(format!(
            "server.log_level `{}` must be one of trace, debug, info, warn, error",
            config.server.log_level
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    check_url(&mut errors, "messaging.service_url", &config.messaging.service_url);
    check_url(&mut errors, "dispatch.graph_api_base", &config.dispatch.graph_api_base);
    check_url(&mut errors, "dispatch.dialog360_base", &config.dispatch.dialog360_base);
    check_url(&mut errors, "dispatch.twilio_base", &config.dispatch.twilio_base);
    check_url(&mut errors, "dispatch.telegram_base", &config.dispatch.telegram_base);

    check_timeout(&mut errors, "messaging.timeout_secs", config.messaging.timeout_secs);
    check_timeout(&mut errors, "dispatch.timeout_secs", config.dispatch.timeout_secs);

    let rotation = &config.rotation;
    if rotation.enabled && rotation.interval_secs == 0 {
        errors.push(ConfigError::validation(
            "rotation.interval_secs must be greater than 0",
        ));
    }
    if rotation.warning_days == 0 {
        errors.push(ConfigError::validation(
            "rotation.warning_days must be at least 1",
        ));
    }
    if let Some(email) = &rotation.notification_email
        && !email.contains('@')
    {
        errors.push(ConfigError::validation(format!(
            "rotation.notification_email `{email}` is not an email address"
        )));
    }
    if rotation.meta_app_id.is_some() != rotation.meta_app_secret.is_some() {
        errors.push(ConfigError::validation(
            "rotation.meta_app_id and rotation.meta_app_secret must be set together",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "{key} `{value}` must start with http:// or https://"
        )));
    }
}

fn check_timeout(errors: &mut Vec<ConfigError>, key: &str, secs: u64) {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        errors.push(ConfigError::validation(format!(
            "{key} must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&CourierConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = CourierConfig::default();
        config.server.host = String::new();
        config.dispatch.timeout_secs = 0;
        config.messaging.service_url = "ftp://downstream".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_unbounded_provider_timeout() {
        let mut config = CourierConfig::default();
        config.dispatch.timeout_secs = 600;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("dispatch.timeout_secs"));
    }

    #[test]
    fn meta_app_credentials_come_in_pairs() {
        let mut config = CourierConfig::default();
        config.rotation.meta_app_id = Some("123".to_string());
        assert!(validate_config(&config).is_err());
        config.rotation.meta_app_secret = Some("shh".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
