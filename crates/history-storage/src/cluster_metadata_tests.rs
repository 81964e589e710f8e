// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn two_cluster_topology() -> StaticClusterMetadata {
    let mut versions = BTreeMap::new();
    versions.insert(0, "active".to_string());
    versions.insert(1, "standby".to_string());
    StaticClusterMetadata::new("active", versions, 2, true)
}

#[test]
fn resolves_owning_cluster_by_version_stride() {
    let topology = two_cluster_topology();
    assert_eq!(topology.cluster_name_for_failover_version(0), Some("active".to_string()));
    assert_eq!(topology.cluster_name_for_failover_version(2), Some("active".to_string()));
    assert_eq!(topology.cluster_name_for_failover_version(1), Some("standby".to_string()));
    assert_eq!(topology.cluster_name_for_failover_version(3), Some("standby".to_string()));
}

#[test]
fn same_cluster_check_uses_resolved_names() {
    let topology = two_cluster_topology();
    assert!(topology.is_version_from_same_cluster(0, 2));
    assert!(!topology.is_version_from_same_cluster(0, 1));
}

#[test]
fn unknown_increment_yields_no_owner() {
    let mut versions = BTreeMap::new();
    versions.insert(0, "solo".to_string());
    let topology = StaticClusterMetadata::new("solo", versions, 0, false);
    assert_eq!(topology.cluster_name_for_failover_version(5), None);
    assert!(!topology.is_global_namespace_enabled());
}
