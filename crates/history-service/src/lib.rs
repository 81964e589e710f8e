// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! history-service: the process that wires the replicator core
//! (`history-replicator`) to its in-memory Persistence Capability
//! (`history-storage`) and exposes the request surface (`history-wire`)
//! through a thin façade, plus the ambient stack (config, metrics, a
//! background replication-queue sampler) a deployment of this shape needs.

pub mod config;
pub mod metrics;
pub mod replication_worker;
pub mod service;

pub use config::Config;
pub use metrics::Metrics;
pub use replication_worker::ReplicationWorker;
pub use service::Service;
