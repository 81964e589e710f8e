// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The conflict resolver (§4.9): rebuilds a run's mutable state from scratch
//! by replaying persisted history up to a cut point, used whenever the
//! version-checking path (§4.6) detects that this cluster's view has
//! diverged from a peer's.

use crate::error::map_storage_error;
use crate::resources::Resources;
use crate::start_replication::fresh_builder;
use history_core::clock::Clock;
use history_core::identity::{NamespaceId, RunId, WorkflowId};
use history_core::mutable_state::{MutableStateBuilder, TransactionPolicy};
use history_core::{FailoverVersion, ReplicatorError};

/// Replay history up to and including `cut_event_id`, producing a fresh
/// builder that carries `update_condition` forward so the caller's eventual
/// commit stays conditional on the view it originally read (invariant 6).
/// Does not commit; the caller appends the new incoming events on top of the
/// result and commits once.
pub async fn rebuild_mutable_state<C: Clock>(
    resources: &Resources<C>,
    namespace_id: NamespaceId,
    workflow_id: &WorkflowId,
    run_id: RunId,
    branch_token: &[u8],
    start_version: FailoverVersion,
    cut_event_id: i64,
    update_condition: i64,
) -> Result<MutableStateBuilder, ReplicatorError> {
    let history = resources
        .history_store
        .read_history(&branch_token.to_vec(), cut_event_id)
        .await
        .map_err(|e| map_storage_error(e, namespace_id, workflow_id))?;

    let mut builder = fresh_builder(namespace_id, run_id, branch_token.to_vec(), start_version);
    history_core::apply_events(&mut builder, &history).map_err(|e| ReplicatorError::Internal(e.to_string()))?;

    let (mut snapshot, _) = builder.close_transaction_as_snapshot(0, TransactionPolicy::Passive);
    snapshot.update_condition = update_condition;
    Ok(MutableStateBuilder::from_snapshot(snapshot))
}

#[cfg(test)]
#[path = "conflict_resolver_tests.rs"]
mod tests;
