// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A static, configuration-driven implementation of
//! [`history_core::ClusterMetadata`]. Real topology changes (a cluster
//! added, a failover version range reassigned) require a process restart;
//! a dynamically-refreshed registry is out of scope here.

use history_core::failover::{ClusterMetadata, FailoverVersion};
use std::collections::BTreeMap;

/// Maps each half-open range of failover versions `[start, next_start)` to
/// the cluster that owned write authority in that range, the same scheme
/// real deployments use: a cluster is assigned a stride of the version
/// space (e.g. cluster 0 gets `0, 2, 4, ...` and cluster 1 gets
/// `1, 3, 5, ...` in a two-cluster topology with `failover_version_increment = 2`).
#[derive(Debug, Clone)]
pub struct StaticClusterMetadata {
    current_cluster_name: String,
    /// cluster name -> its initial failover version (the remainder class).
    initial_failover_versions: BTreeMap<FailoverVersion, String>,
    failover_version_increment: FailoverVersion,
    global_namespace_enabled: bool,
}

impl StaticClusterMetadata {
    pub fn new(
        current_cluster_name: impl Into<String>,
        initial_failover_versions: BTreeMap<FailoverVersion, String>,
        failover_version_increment: FailoverVersion,
        global_namespace_enabled: bool,
    ) -> Self {
        Self {
            current_cluster_name: current_cluster_name.into(),
            initial_failover_versions,
            failover_version_increment,
            global_namespace_enabled,
        }
    }
}

impl ClusterMetadata for StaticClusterMetadata {
    fn current_cluster_name(&self) -> &str {
        &self.current_cluster_name
    }

    fn cluster_name_for_failover_version(&self, version: FailoverVersion) -> Option<String> {
        if self.failover_version_increment <= 0 {
            return None;
        }
        let remainder = version.rem_euclid(self.failover_version_increment);
        self.initial_failover_versions.get(&remainder).cloned()
    }

    fn is_global_namespace_enabled(&self) -> bool {
        self.global_namespace_enabled
    }

    fn all_cluster_info(&self) -> Vec<String> {
        self.initial_failover_versions.values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "cluster_metadata_tests.rs"]
mod tests;
