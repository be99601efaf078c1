// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// End-of-block calls that distributed and advanced programs.
    pub blocks_processed_total: IntCounter,
    /// End-of-block calls skipped for a negative or backwards clock.
    pub blocks_skipped_total: IntCounter,
    /// Messages committed.
    pub messages_accepted_total: IntCounter,
    /// Messages rejected (nothing committed).
    pub messages_rejected_total: IntCounter,
    /// Claims that paid a nonzero amount.
    pub claims_total: IntCounter,

    /// Last rewards time (unix seconds).
    pub last_rewards_time: IntGauge,
    /// Upcoming programs.
    pub programs_upcoming: IntGauge,
    /// Ongoing programs.
    pub programs_ongoing: IntGauge,
    /// Completed programs.
    pub programs_completed: IntGauge,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, MetricsError> {
    let c = IntCounter::new(name, help).map_err(|_| MetricsError::Prom)?;
    registry
        .register(Box::new(c.clone()))
        .map_err(|_| MetricsError::Prom)?;
    Ok(c)
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, MetricsError> {
    let g = IntGauge::new(name, help).map_err(|_| MetricsError::Prom)?;
    registry
        .register(Box::new(g.clone()))
        .map_err(|_| MetricsError::Prom)?;
    Ok(g)
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let blocks_processed_total = counter(
            &registry,
            "incentive_blocks_processed_total",
            "End-of-block calls processed",
        )?;
        let blocks_skipped_total = counter(
            &registry,
            "incentive_blocks_skipped_total",
            "End-of-block calls skipped for clock errors",
        )?;
        let messages_accepted_total =
            counter(&registry, "incentive_messages_accepted_total", "Messages committed")?;
        let messages_rejected_total =
            counter(&registry, "incentive_messages_rejected_total", "Messages rejected")?;
        let claims_total = counter(&registry, "incentive_claims_total", "Nonzero reward claims")?;

        let last_rewards_time = gauge(
            &registry,
            "incentive_last_rewards_time",
            "Last rewards time (unix seconds)",
        )?;
        let programs_upcoming =
            gauge(&registry, "incentive_programs_upcoming", "Upcoming incentive programs")?;
        let programs_ongoing =
            gauge(&registry, "incentive_programs_ongoing", "Ongoing incentive programs")?;
        let programs_completed =
            gauge(&registry, "incentive_programs_completed", "Completed incentive programs")?;

        Ok(Self {
            registry,
            blocks_processed_total,
            blocks_skipped_total,
            messages_accepted_total,
            messages_rejected_total,
            claims_total,
            last_rewards_time,
            programs_upcoming,
            programs_ongoing,
            programs_completed,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|_| MetricsError::Prom)?;
        String::from_utf8(buf).map_err(|_| MetricsError::Prom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_registered_metrics() {
        let m = Metrics::new().unwrap();
        m.blocks_processed_total.inc();
        m.last_rewards_time.set(42);
        let text = m.render().unwrap();
        assert!(text.contains("incentive_blocks_processed_total 1"));
        assert!(text.contains("incentive_last_rewards_time 42"));
    }
}
