// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability bundle every replicator entry point is handed (§9
//! "Global state"): persistence, the execution cache, cluster topology, the
//! history-event notifier, and the clock, injected once at construction
//! rather than reached for through module statics.

use crate::cache::ExecutionCache;
use crate::notifier::HistoryEventNotifier;
use history_core::clock::Clock;
use history_core::failover::ClusterMetadata;
use history_storage::{ExecutionStore, HistoryStore, NamespaceCache, ShardStore};
use std::sync::Arc;

/// Generic over the clock because [`Clock`] requires `Clone`, which isn't
/// object-safe; every other capability here is reached through a trait
/// object since none of them need to be cloned whole.
pub struct Resources<C: Clock> {
    pub execution_store: Arc<dyn ExecutionStore>,
    pub history_store: Arc<dyn HistoryStore>,
    pub shard_store: Arc<dyn ShardStore>,
    pub namespace_cache: Arc<dyn NamespaceCache>,
    pub cluster_metadata: Arc<dyn ClusterMetadata>,
    pub execution_cache: Arc<ExecutionCache>,
    /// The long-poll `PollMutableState` condition variable (§9 "Concurrency
    /// shape"). Sized generously by default since callers rarely need to
    /// tune it per deployment; use [`Self::with_notifier`] to override.
    pub history_event_notifier: Arc<HistoryEventNotifier>,
    pub clock: C,
}

impl<C: Clock> Resources<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        execution_store: Arc<dyn ExecutionStore>,
        history_store: Arc<dyn HistoryStore>,
        shard_store: Arc<dyn ShardStore>,
        namespace_cache: Arc<dyn NamespaceCache>,
        cluster_metadata: Arc<dyn ClusterMetadata>,
        execution_cache: Arc<ExecutionCache>,
        clock: C,
    ) -> Self {
        Self {
            execution_store,
            history_store,
            shard_store,
            namespace_cache,
            cluster_metadata,
            execution_cache,
            history_event_notifier: Arc::new(HistoryEventNotifier::new(32, 4096)),
            clock,
        }
    }

    /// Override the default-sized history-event notifier, e.g. to match a
    /// deployment's shard count.
    pub fn with_notifier(mut self, notifier: Arc<HistoryEventNotifier>) -> Self {
        self.history_event_notifier = notifier;
        self
    }
}
