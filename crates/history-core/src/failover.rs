// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failover versions and cluster metadata.
//!
//! A failover version is a monotone `i64` issued by the cluster metadata
//! service whenever write authority for the namespace moves to a different
//! cluster. Every event is stamped with the failover version in effect when
//! its authoring cluster wrote it, which is what lets the replicator tell
//! which cluster's writes should win when two active regions diverge.

/// Monotone version assigned at failover time. `0` is never issued.
pub type FailoverVersion = i64;

/// Read-only view over the cluster topology the replicator needs. The
/// concrete registry (refreshed in the background, namespace-scoped) lives
/// outside this crate; this trait is the capability contract described by
/// the external interface.
pub trait ClusterMetadata: Send + Sync {
    /// The name of the cluster this process belongs to.
    fn current_cluster_name(&self) -> &str;

    /// Which cluster owned write authority when `version` was issued.
    fn cluster_name_for_failover_version(&self, version: FailoverVersion) -> Option<String>;

    /// Whether `candidate` and `reference` were issued to the same cluster's
    /// authorship lineage (used to distinguish a legitimate version bump by
    /// the same peer from a genuine multi-cluster conflict).
    fn is_version_from_same_cluster(&self, candidate: FailoverVersion, reference: FailoverVersion) -> bool {
        match (
            self.cluster_name_for_failover_version(candidate),
            self.cluster_name_for_failover_version(reference),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Whether this namespace replicates across more than one cluster.
    fn is_global_namespace_enabled(&self) -> bool;

    /// All clusters known to the topology, for diagnostics and DLQ routing.
    fn all_cluster_info(&self) -> Vec<String>;
}

#[cfg(test)]
#[path = "failover_tests.rs"]
mod tests;
