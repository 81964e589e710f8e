// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn append_rejects_non_monotone_event_id() {
    let mut vh = VersionHistory::new();
    vh.append(5, 100).unwrap();
    assert_eq!(vh.append(5, 100), Err(VersionHistoryError::NonMonotoneEventId(5)));
    assert_eq!(vh.append(4, 100), Err(VersionHistoryError::NonMonotoneEventId(4)));
}

#[test]
fn append_rejects_regressing_version() {
    let mut vh = VersionHistory::new();
    vh.append(5, 100).unwrap();
    assert_eq!(vh.append(6, 50), Err(VersionHistoryError::RegressingVersion(50, 100)));
}

#[test]
fn append_merges_same_version_items() {
    let mut vh = VersionHistory::new();
    vh.append(1, 100).unwrap();
    vh.append(2, 100).unwrap();
    vh.append(3, 100).unwrap();
    assert_eq!(vh.items().len(), 1);
    assert_eq!(vh.last_event_id(), 3);
}

#[test]
fn append_records_new_item_on_version_bump() {
    let mut vh = VersionHistory::new();
    vh.append(5, 100).unwrap();
    vh.append(10, 200).unwrap();
    assert_eq!(vh.items().len(), 2);
    assert_eq!(vh.last_version(), 200);
}

#[test]
fn version_at_returns_version_in_effect() {
    let mut vh = VersionHistory::new();
    vh.append(5, 100).unwrap();
    vh.append(10, 200).unwrap();
    assert_eq!(vh.version_at(3), Some(100));
    assert_eq!(vh.version_at(5), Some(100));
    assert_eq!(vh.version_at(7), Some(200));
    assert_eq!(vh.version_at(10), Some(200));
    assert_eq!(vh.version_at(11), None);
}

#[test]
fn truncate_drops_events_beyond_cut() {
    let mut vh = VersionHistory::new();
    vh.append(5, 100).unwrap();
    vh.append(10, 200).unwrap();
    vh.truncate(7);
    assert_eq!(vh.items(), &[VersionHistoryItem::new(5, 100), VersionHistoryItem::new(7, 200)]);
}

#[test]
fn fork_at_creates_new_current_branch_leaving_old_one_intact() {
    let mut vh = VersionHistory::new();
    vh.append(5, 100).unwrap();
    vh.append(10, 200).unwrap();
    let mut histories = VersionHistories::new(vh);
    histories.fork_at(7);

    assert_eq!(histories.branches().len(), 2);
    assert_eq!(histories.current().last_event_id(), 7);
    assert_eq!(histories.branches()[0].last_event_id(), 10);
}
