// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn ns() -> NamespaceId {
    NamespaceId::new()
}

#[test]
fn retriable_variants_are_classified_as_retriable_only() {
    let err = ReplicatorError::RetryBufferEvents {
        namespace_id: ns(),
        workflow_id: WorkflowId::new("w"),
        run_id: RunId::new(),
        next_event_id: 5,
    };
    assert!(err.is_retriable());
    assert!(!err.is_conflict());
    assert!(!err.is_transient_persistence());
}

#[test]
fn conflict_variants_are_classified_as_conflict_only() {
    let err = ReplicatorError::MoreThan2DC { namespace_id: ns(), workflow_id: WorkflowId::new("w") };
    assert!(err.is_conflict());
    assert!(!err.is_retriable());
}

#[test]
fn transient_persistence_variants_classified_correctly() {
    assert!(ReplicatorError::ShardOwnershipLost.is_transient_persistence());
    assert!(ReplicatorError::ConditionFailed.is_transient_persistence());
    assert!(!ReplicatorError::ShardOwnershipLost.is_retriable());
}

#[test]
fn internal_and_cancelled_are_not_classified_in_any_policy_bucket() {
    let err = ReplicatorError::Internal("boom".into());
    assert!(!err.is_retriable() && !err.is_conflict() && !err.is_transient_persistence());
    assert!(!ReplicatorError::Cancelled.is_retriable());
}
