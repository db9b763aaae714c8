use crate::harness::{Assertion, Scenario};
use planedit_core::ItemType;
use serde_json::json;

/// Test that fixture loading works correctly
#[test]
fn test_fixture_loading() {
    Scenario::new("fixture_loading")
        .from_fixture("default")
        .open(ItemType::Event, "evt-1")
        .assert_item("slugline", json!("BUDGET"))
        .open(ItemType::Planning, "plan-1")
        .assert_item("headline", json!("Election night coverage"))
        .run()
        .unwrap();
}

/// Test that a workspace without items starts with an empty server
#[test]
fn test_empty_workspace_has_no_items() {
    Scenario::new("empty_workspace")
        .open(ItemType::Event, "evt-1")
        .assert(Assertion::LastErrorContains("no item evt-1".into()))
        .run()
        .unwrap();
}

/// Test that an overriding config file disables autosave
#[test]
fn test_config_override_disables_autosave() {
    Scenario::new("autosave_disabled")
        .from_fixture("default")
        .with_file("planedit.toml", b"[autosave]\nenabled = false\n")
        .open(ItemType::Event, "evt-1")
        .edit("name", json!("Not autosaved"))
        .assert(Assertion::AutosavePending(false))
        .wait_millis(10_000)
        .cancel()
        .assert_no_autosave()
        .run()
        .unwrap();
}

/// Test that a shorter configured interval is honoured
#[test]
fn test_config_override_interval() {
    Scenario::new("short_interval")
        .from_fixture("default")
        .with_file("planedit.toml", b"[autosave]\ninterval_ms = 500\n")
        .open(ItemType::Event, "evt-1")
        .edit("name", json!("Quick"))
        .wait_millis(500)
        .assert_autosaved("name", json!("Quick"))
        .run()
        .unwrap();
}

/// Test that new items get temporary ids from the configured prefix
#[test]
fn test_config_override_temp_prefix() {
    Scenario::new("temp_prefix")
        .from_fixture("default")
        .with_file("planedit.toml", b"[session]\ntemp_id_prefix = \"draft-\"\n")
        .open_new(ItemType::Planning, None)
        .assert(Assertion::TempItemId)
        .run()
        .unwrap();
}
