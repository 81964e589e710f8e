// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replication metrics, registered against a `prometheus::Registry` the
//! same way the rest of this stack wires up a metrics registry. Serving
//! them over HTTP is transport plumbing (out of scope, §1); what this
//! module guarantees is that every ingest path records itself, so whatever
//! scrapes this process later has something to read.

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

pub struct Metrics {
    registry: Registry,
    pub events_applied_total: IntCounter,
    pub conflicts_total: IntCounterVec,
    pub dlq_routed_total: IntCounter,
    pub replication_tasks_polled_total: IntCounter,
    pub execution_cache_size: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        // Metric name/help strings below are fixed constants validated by hand, not user input.
        #[allow(clippy::expect_used)]
        let events_applied_total = IntCounter::new("history_replicator_events_applied_total", "Replicated history events successfully applied").expect("static metric name/help");
        #[allow(clippy::expect_used)]
        let conflicts_total = IntCounterVec::new(
            Opts::new("history_replicator_conflicts_total", "Replicated batches rejected as protocol conflicts, by error variant"),
            &["kind"],
        )
        .expect("static metric name/help");
        #[allow(clippy::expect_used)]
        let dlq_routed_total = IntCounter::new("history_replicator_dlq_routed_total", "Replication tasks routed to the dead-letter queue").expect("static metric name/help");
        #[allow(clippy::expect_used)]
        let replication_tasks_polled_total =
            IntCounter::new("history_replicator_tasks_polled_total", "Replication tasks drained from GetReplicationMessages").expect("static metric name/help");
        #[allow(clippy::expect_used)]
        let execution_cache_size = IntGauge::new("history_replicator_execution_cache_size", "Entries currently resident in the execution cache").expect("static metric name/help");

        // Each collector above is constructed fresh and registered exactly once, here.
        #[allow(clippy::expect_used)]
        registry.register(Box::new(events_applied_total.clone())).expect("metric registered exactly once");
        #[allow(clippy::expect_used)]
        registry.register(Box::new(conflicts_total.clone())).expect("metric registered exactly once");
        #[allow(clippy::expect_used)]
        registry.register(Box::new(dlq_routed_total.clone())).expect("metric registered exactly once");
        #[allow(clippy::expect_used)]
        registry.register(Box::new(replication_tasks_polled_total.clone())).expect("metric registered exactly once");
        #[allow(clippy::expect_used)]
        registry.register(Box::new(execution_cache_size.clone())).expect("metric registered exactly once");

        Self { registry, events_applied_total, conflicts_total, dlq_routed_total, replication_tasks_polled_total, execution_cache_size }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render the current snapshot in Prometheus text exposition format,
    /// for whatever scrape path or log line wants it.
    pub fn render(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        // `families` comes straight from `self.registry.gather()`, which only
        // ever yields well-formed metric families for collectors registered above.
        #[allow(clippy::expect_used)]
        encoder.encode(&families, &mut buf).expect("well-formed metric families");
        // The Prometheus text encoder is documented to emit UTF-8 only.
        #[allow(clippy::expect_used)]
        String::from_utf8(buf).expect("prometheus text encoder emits UTF-8")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
