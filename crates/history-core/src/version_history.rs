// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version histories: the per-branch ledger proving event lineage.

use crate::failover::FailoverVersion;
use serde::{Deserialize, Serialize};

/// A single `(event_id, version)` fact: "the event at `event_id` on this
/// branch was authored under failover version `version`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistoryItem {
    pub event_id: i64,
    pub version: FailoverVersion,
}

impl VersionHistoryItem {
    pub fn new(event_id: i64, version: FailoverVersion) -> Self {
        Self { event_id, version }
    }
}

/// One branch of a run's event history: a sequence of items monotone in
/// `event_id`, whose `version` may only transition upward along the branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    items: Vec<VersionHistoryItem>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionHistoryError {
    #[error("version history item event_id {0} is not greater than the last recorded event_id")]
    NonMonotoneEventId(i64),
    #[error("version history item version {0} regresses below the last recorded version {1}")]
    RegressingVersion(FailoverVersion, FailoverVersion),
}

impl VersionHistory {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[VersionHistoryItem] {
        &self.items
    }

    pub fn last_item(&self) -> Option<&VersionHistoryItem> {
        self.items.last()
    }

    pub fn last_event_id(&self) -> i64 {
        self.items.last().map(|i| i.event_id).unwrap_or(0)
    }

    pub fn last_version(&self) -> FailoverVersion {
        self.items.last().map(|i| i.version).unwrap_or(0)
    }

    /// Append a `(event_id, version)` fact, enforcing monotone event IDs and
    /// non-regressing versions (invariants 2 and 3 of the data model). If
    /// `version` equals the last recorded version, the item is merged by
    /// advancing `event_id` in place rather than appended, so a branch
    /// records one item per failover handoff, not one per event.
    pub fn append(&mut self, event_id: i64, version: FailoverVersion) -> Result<(), VersionHistoryError> {
        if let Some(last) = self.items.last() {
            if event_id <= last.event_id {
                return Err(VersionHistoryError::NonMonotoneEventId(event_id));
            }
            if version < last.version {
                return Err(VersionHistoryError::RegressingVersion(version, last.version));
            }
            if version == last.version {
                // `self.items.last()` was `Some` in the `if let` above and
                // nothing between there and here mutates `self.items`.
                #[allow(clippy::expect_used)]
                let item = self.items.last_mut().expect("checked above");
                item.event_id = event_id;
                return Ok(());
            }
        }
        self.items.push(VersionHistoryItem::new(event_id, version));
        Ok(())
    }

    /// The version in effect for `event_id`, or `None` if `event_id` is
    /// beyond anything recorded on this branch.
    pub fn version_at(&self, event_id: i64) -> Option<FailoverVersion> {
        self.items.iter().find(|item| item.event_id >= event_id).map(|item| item.version)
    }

    /// Truncate the branch so its last recorded event is `cut_event_id`,
    /// used by the conflict resolver to discard events beyond a reset
    /// boundary.
    pub fn truncate(&mut self, cut_event_id: i64) {
        self.items.retain(|item| item.event_id <= cut_event_id);
        if let Some(last) = self.items.last_mut() {
            if last.event_id > cut_event_id {
                last.event_id = cut_event_id;
            }
        }
    }
}

/// All branches of a run plus an index of which one is current. Branches
/// other than the current one exist only because a conflict-resolver reset
/// rewound history; they are kept for diagnostics, never replayed into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionHistories {
    branches: Vec<VersionHistory>,
    current_branch_index: usize,
}

impl VersionHistories {
    pub fn new(initial: VersionHistory) -> Self {
        Self { branches: vec![initial], current_branch_index: 0 }
    }

    pub fn current(&self) -> &VersionHistory {
        &self.branches[self.current_branch_index]
    }

    pub fn current_mut(&mut self) -> &mut VersionHistory {
        &mut self.branches[self.current_branch_index]
    }

    pub fn branches(&self) -> &[VersionHistory] {
        &self.branches
    }

    /// Fork a new branch from the current one truncated at `cut_event_id`,
    /// and make it current. Used by the conflict resolver: the pre-reset
    /// branch is retained at its old index for audit, the new branch is what
    /// subsequent replication appends onto.
    pub fn fork_at(&mut self, cut_event_id: i64) {
        let mut forked = self.current().clone();
        forked.truncate(cut_event_id);
        self.branches.push(forked);
        self.current_branch_index = self.branches.len() - 1;
    }
}

#[cfg(test)]
#[path = "version_history_tests.rs"]
mod tests;
