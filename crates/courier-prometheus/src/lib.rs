// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for the Courier gateway.
//!
//! Crates record through the metrics-rs facade via the helpers in
//! [`recording`]; the binary installs [`PrometheusAdapter`] once and the
//! gateway renders it on `/metrics`.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use courier_core::{AdapterType, CourierError, HealthStatus, PluginAdapter};

pub use recording::{
    record_outbound, record_persistence_failure, record_provider_latency, record_rotation,
    record_webhook, register_metrics,
};

/// Owns the process-wide Prometheus recorder.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn new() -> Result<Self, CourierError> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| CourierError::Internal(format!("failed to install Prometheus recorder: {e}")))?;

        recording::register_metrics();
        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, CourierError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CourierError> {
        Ok(())
    }
}
