// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the service binary,
//! following the same lookup-with-default shape as the rest of this stack's
//! env-driven configuration.

use std::collections::BTreeMap;
use std::time::Duration;

/// Static cluster topology, assembled from environment variables at
/// startup. A dynamically-refreshed registry is out of scope
/// (`StaticClusterMetadata`'s own doc comment).
#[derive(Debug, Clone)]
pub struct Config {
    pub current_cluster_name: String,
    /// cluster name -> the remainder class it owns in the failover-version
    /// stride (see `HISTORY_FAILOVER_VERSION_INCREMENT`).
    pub initial_failover_versions: BTreeMap<i64, String>,
    pub failover_version_increment: i64,
    pub global_namespace_enabled: bool,
    pub num_shards: usize,
    pub execution_cache_capacity_per_shard: usize,
    pub replication_poll_interval: Duration,
    pub replication_poll_batch_size: usize,
    pub metrics_addr: String,
}

impl Config {
    /// Resolve configuration from the process environment. Falls back to a
    /// single-cluster, non-global-namespace topology so the service still
    /// starts in a dev environment with nothing configured.
    pub fn from_env() -> Self {
        let current_cluster_name = std::env::var("HISTORY_CLUSTER_NAME").unwrap_or_else(|_| "cluster-0".to_string());
        let failover_version_increment = std::env::var("HISTORY_FAILOVER_VERSION_INCREMENT")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(1);

        let initial_failover_versions = parse_cluster_map(std::env::var("HISTORY_CLUSTERS").ok().as_deref())
            .unwrap_or_else(|| BTreeMap::from([(0, current_cluster_name.clone())]));

        Self {
            current_cluster_name,
            initial_failover_versions,
            failover_version_increment,
            global_namespace_enabled: std::env::var("HISTORY_GLOBAL_NAMESPACE").ok().as_deref() == Some("true"),
            num_shards: std::env::var("HISTORY_SHARD_COUNT").ok().and_then(|s| s.parse().ok()).unwrap_or(32),
            execution_cache_capacity_per_shard: std::env::var("HISTORY_CACHE_CAPACITY").ok().and_then(|s| s.parse().ok()).unwrap_or(4096),
            replication_poll_interval: std::env::var("HISTORY_REPLICATION_POLL_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(200)),
            replication_poll_batch_size: std::env::var("HISTORY_REPLICATION_POLL_BATCH").ok().and_then(|s| s.parse().ok()).unwrap_or(100),
            metrics_addr: std::env::var("HISTORY_METRICS_ADDR").unwrap_or_else(|_| "0.0.0.0:9090".to_string()),
        }
    }

    /// Number of shards this process owns, `0..num_local_shards`. A real
    /// deployment derives this from a shard controller's assignment; here
    /// it's simply every shard the cache is configured for.
    pub fn owned_shard_ids(&self) -> Vec<u32> {
        (0..self.num_shards as u32).collect()
    }
}

/// Parses `HISTORY_CLUSTERS` as `remainder=name,remainder=name,...`, e.g.
/// `0=cluster-a,1=cluster-b` for a two-cluster topology.
fn parse_cluster_map(raw: Option<&str>) -> Option<BTreeMap<i64, String>> {
    let raw = raw?;
    let mut map = BTreeMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (remainder, name) = entry.split_once('=')?;
        map.insert(remainder.trim().parse().ok()?, name.trim().to_string());
    }
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
