// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.

use metrics::{describe_counter, describe_histogram};

/// Register all Courier metric descriptions. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "courier_webhooks_total",
        "Inbound webhooks by platform and outcome"
    );
    describe_counter!(
        "courier_persistence_failures_total",
        "Best-effort audit writes that failed, by table"
    );
    describe_counter!(
        "courier_outbound_total",
        "Outbound sends by platform and terminal status"
    );
    describe_counter!(
        "courier_rotation_total",
        "Token rotation scan actions by outcome"
    );
    describe_histogram!(
        "courier_provider_latency_seconds",
        "Provider API call latency in seconds"
    );
}

/// `outcome` is `accepted` or an error code.
pub fn record_webhook(platform: &str, outcome: &str) {
    metrics::counter!(
        "courier_webhooks_total",
        "platform" => platform.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_persistence_failure(table: &'static str) {
    metrics::counter!("courier_persistence_failures_total", "table" => table).increment(1);
}

pub fn record_outbound(platform: &str, status: &str) {
    metrics::counter!(
        "courier_outbound_total",
        "platform" => platform.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// `outcome` is one of `warned`, `deactivated`, `rotated`, `failed`.
pub fn record_rotation(outcome: &'static str) {
    metrics::counter!("courier_rotation_total", "outcome" => outcome).increment(1);
}

pub fn record_provider_latency(route: &str, seconds: f64) {
    metrics::histogram!("courier_provider_latency_seconds", "route" => route.to_string())
        .record(seconds);
}
