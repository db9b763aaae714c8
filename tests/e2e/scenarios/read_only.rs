use crate::harness::{Assertion, Scenario};
use planedit_core::ItemType;
use serde_json::json;

#[test]
fn test_unlocked_item_is_read_only() {
    Scenario::new("unlocked_read_only")
        .from_fixture("default")
        .open(ItemType::Planning, "plan-1")
        .assert(Assertion::ReadOnly(true))
        .run()
        .unwrap();
}

#[test]
fn test_own_edit_lock_allows_editing() {
    Scenario::new("own_lock_editable")
        .from_fixture("default")
        .lock("plan-1", "editor", "session-1")
        .open(ItemType::Planning, "plan-1")
        .assert(Assertion::ReadOnly(false))
        .run()
        .unwrap();
}

#[test]
fn test_lock_held_elsewhere_is_read_only() {
    Scenario::new("foreign_lock_read_only")
        .from_fixture("default")
        .lock("evt-1", "editor", "other-tab")
        .open(ItemType::Event, "evt-1")
        .assert(Assertion::ReadOnly(true))
        .run()
        .unwrap();
}

#[test]
fn test_killed_item_is_read_only_under_own_lock() {
    Scenario::new("killed_read_only")
        .from_fixture("default")
        .lock("plan-killed", "editor", "session-1")
        .open(ItemType::Planning, "plan-killed")
        .assert(Assertion::ReadOnly(true))
        .run()
        .unwrap();
}

#[test]
fn test_new_item_is_never_read_only() {
    Scenario::new("new_item_editable")
        .from_fixture("default")
        .open_new(ItemType::Event, Some(json!({"name": "Draft"})))
        .assert(Assertion::ReadOnly(false))
        .run()
        .unwrap();
}

#[test]
fn test_unpost_makes_item_read_only() {
    Scenario::new("unpost_read_only")
        .from_fixture("default")
        .lock("plan-1", "editor", "session-1")
        .open(ItemType::Planning, "plan-1")
        .assert(Assertion::ReadOnly(false))
        .unpost()
        .assert_item("state", json!("killed"))
        .assert(Assertion::ReadOnly(true))
        .run()
        .unwrap();
}
