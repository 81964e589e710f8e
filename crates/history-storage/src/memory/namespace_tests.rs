// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::namespace_cache::ReplicationConfig;

fn seeded(cache: &InMemoryNamespaceCache) -> NamespaceId {
    let namespace_id = NamespaceId::new();
    cache.seed(NamespaceInfo {
        namespace_id,
        name: "orders".to_string(),
        replication_config: ReplicationConfig { active_cluster_name: "active".into(), clusters: vec!["active".into(), "standby".into()] },
        failover_version: 10,
        is_global_namespace: true,
    });
    namespace_id
}

#[tokio::test]
async fn lookup_by_id_and_name() {
    let cache = InMemoryNamespaceCache::new();
    let namespace_id = seeded(&cache);

    let by_id = cache.get_namespace_by_id(namespace_id).await.unwrap();
    assert_eq!(by_id.name, "orders");

    let by_name = cache.get_namespace_by_name("orders").await.unwrap();
    assert_eq!(by_name.namespace_id, namespace_id);
}

#[tokio::test]
async fn unknown_namespace_is_an_error() {
    let cache = InMemoryNamespaceCache::new();
    assert!(cache.get_namespace_by_name("missing").await.is_err());
}
