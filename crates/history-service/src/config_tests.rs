// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Mutex;

// Environment variables are process-global; serialize tests that touch them
// so parallel test threads don't stomp on each other's `env::var` reads.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "HISTORY_CLUSTER_NAME",
        "HISTORY_FAILOVER_VERSION_INCREMENT",
        "HISTORY_CLUSTERS",
        "HISTORY_GLOBAL_NAMESPACE",
        "HISTORY_SHARD_COUNT",
        "HISTORY_CACHE_CAPACITY",
        "HISTORY_REPLICATION_POLL_MS",
        "HISTORY_REPLICATION_POLL_BATCH",
        "HISTORY_METRICS_ADDR",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn from_env_falls_back_to_a_single_cluster_topology_with_nothing_configured() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    clear_env();

    let config = Config::from_env();

    assert_eq!(config.current_cluster_name, "cluster-0");
    assert_eq!(config.initial_failover_versions, BTreeMap::from([(0, "cluster-0".to_string())]));
    assert_eq!(config.failover_version_increment, 1);
    assert!(!config.global_namespace_enabled);
    assert_eq!(config.num_shards, 32);
}

#[test]
fn from_env_parses_a_multi_cluster_topology() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    clear_env();
    std::env::set_var("HISTORY_CLUSTER_NAME", "cluster-a");
    std::env::set_var("HISTORY_CLUSTERS", "0=cluster-a, 1=cluster-b");
    std::env::set_var("HISTORY_FAILOVER_VERSION_INCREMENT", "2");
    std::env::set_var("HISTORY_GLOBAL_NAMESPACE", "true");

    let config = Config::from_env();

    assert_eq!(config.current_cluster_name, "cluster-a");
    assert_eq!(config.initial_failover_versions, BTreeMap::from([(0, "cluster-a".to_string()), (1, "cluster-b".to_string())]));
    assert_eq!(config.failover_version_increment, 2);
    assert!(config.global_namespace_enabled);

    clear_env();
}

#[test]
fn owned_shard_ids_covers_the_full_configured_range() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    clear_env();
    std::env::set_var("HISTORY_SHARD_COUNT", "4");

    let config = Config::from_env();
    assert_eq!(config.owned_shard_ids(), vec![0, 1, 2, 3]);

    clear_env();
}

#[test]
fn parse_cluster_map_ignores_blank_entries_and_trims_whitespace() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let map = parse_cluster_map(Some(" 0 = cluster-a ,, 1=cluster-b,"));
    assert_eq!(map, Some(BTreeMap::from([(0, "cluster-a".to_string()), (1, "cluster-b".to_string())])));
}

#[test]
fn parse_cluster_map_rejects_an_entry_missing_the_equals_sign() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    assert_eq!(parse_cluster_map(Some("not-a-pair")), None);
}

#[test]
fn parse_cluster_map_with_no_input_is_none() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    assert_eq!(parse_cluster_map(None), None);
}
