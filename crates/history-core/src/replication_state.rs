// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replication state: what each run has written and last heard from peers.

use crate::failover::FailoverVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The highest `(version, event_id)` a run has observed from one peer
/// cluster, recorded so the version-checking path can tell how far that
/// peer has seen this run's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationInfo {
    pub version: FailoverVersion,
    pub last_event_id: i64,
}

impl ReplicationInfo {
    pub fn new(version: FailoverVersion, last_event_id: i64) -> Self {
        Self { version, last_event_id }
    }
}

/// Per-run replication bookkeeping (§3 `ReplicationState`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicationState {
    pub start_version: FailoverVersion,
    pub current_version: FailoverVersion,
    pub last_write_version: FailoverVersion,
    pub last_write_event_id: i64,
    pub last_replication_info: HashMap<String, ReplicationInfo>,
}

impl ReplicationState {
    pub fn new(start_version: FailoverVersion) -> Self {
        Self {
            start_version,
            current_version: start_version,
            last_write_version: start_version,
            last_write_event_id: 0,
            last_replication_info: HashMap::new(),
        }
    }

    /// Record that this run just committed an event at `(version, event_id)`
    /// authored by this cluster.
    pub fn record_write(&mut self, version: FailoverVersion, event_id: i64) {
        self.current_version = version;
        self.last_write_version = version;
        self.last_write_event_id = event_id;
    }

    /// Record the highest `(version, event_id)` observed from `cluster`.
    pub fn observe_peer(&mut self, cluster: &str, version: FailoverVersion, event_id: i64) {
        let entry = self.last_replication_info.entry(cluster.to_string()).or_default();
        if (version, event_id) > (entry.version, entry.last_event_id) {
            *entry = ReplicationInfo::new(version, event_id);
        }
    }

    pub fn replication_info_for(&self, cluster: &str) -> Option<ReplicationInfo> {
        self.last_replication_info.get(cluster).copied()
    }
}

#[cfg(test)]
#[path = "replication_state_tests.rs"]
mod tests;
