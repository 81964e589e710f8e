// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn task_category_discriminants_are_protocol_stable() {
    assert_eq!(TaskCategory::Transfer as u8, 2);
    assert_eq!(TaskCategory::Timer as u8, 3);
    assert_eq!(TaskCategory::Replication as u8, 4);
}

#[test]
fn task_type_discriminants_are_protocol_stable() {
    assert_eq!(TaskType::ActivityTask as u8, 0);
    assert_eq!(TaskType::DecisionTask as u8, 1);
    assert_eq!(TaskType::HistoryReplication as u8, 17);
}

#[test]
fn task_category_round_trips_through_json() {
    let json = serde_json::to_string(&TaskCategory::Replication).expect("serialize");
    assert_eq!(json, "4");
    let back: TaskCategory = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, TaskCategory::Replication);
}
