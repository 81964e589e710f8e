// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn namespace_ids_are_unique() {
    assert_ne!(NamespaceId::new(), NamespaceId::new());
}

#[test]
fn run_id_lock_order_is_deterministic() {
    let a = RunId::from_uuid(Uuid::nil());
    let b = RunId::from_uuid(Uuid::max());
    assert!(a.lock_order_key() < b.lock_order_key());
}

#[test]
fn workflow_execution_display_includes_both_ids() {
    let run_id = RunId::from_uuid(Uuid::nil());
    let exec = WorkflowExecution::new("order-123", run_id);
    assert_eq!(exec.to_string(), format!("order-123/{run_id}"));
}

#[test]
fn execution_key_equality_is_field_wise() {
    let ns = NamespaceId::new();
    let run_id = RunId::new();
    let a = ExecutionKey::new(ns, "w", run_id);
    let b = ExecutionKey::new(ns, "w", run_id);
    assert_eq!(a, b);
}
