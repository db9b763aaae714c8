use crate::harness::{Assertion, Scenario};
use planedit_core::{CommitOutcome, EditingSession, ItemType, SessionState, UpdateMethod};
use serde_json::json;

#[test]
fn test_open_edit_save() {
    Scenario::new("open_edit_save")
        .from_fixture("default")
        .open(ItemType::Event, "evt-1")
        .assert_state(SessionState::Ready)
        .assert_dirty(false)
        .edit("name", json!("Budget briefing (moved)"))
        .assert_dirty(true)
        .save()
        .assert_outcome(CommitOutcome::Committed)
        .assert_dirty(false)
        .assert_item("name", json!("Budget briefing (moved)"))
        .assert_server("evt-1", "name", json!("Budget briefing (moved)"))
        .assert(Assertion::ServerWrites(1))
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_event_save_sends_update_method() {
    Scenario::new("event_update_method")
        .from_fixture("default")
        .open(ItemType::Event, "evt-1")
        .edit("slugline", json!("BUDGET-SERIES"))
        .save_with(UpdateMethod::Future)
        .assert_outcome(CommitOutcome::Committed)
        .assert_server("evt-1", "slugline", json!("BUDGET-SERIES"))
        // The server consumes update_method; it is not part of the item
        .assert(Assertion::DiffFieldAbsent("update_method".into()))
        .run()
        .unwrap();
}

#[test]
fn test_save_and_post_forces_publication() {
    Scenario::new("save_and_post")
        .from_fixture("default")
        .open(ItemType::Planning, "plan-1")
        .edit("headline", json!("Election night"))
        .save_and_post()
        .assert_outcome(CommitOutcome::Committed)
        .assert_server("plan-1", "state", json!("scheduled"))
        .assert_server("plan-1", "pubstatus", json!("usable"))
        .assert_server("plan-1", "headline", json!("Election night"))
        .assert_dirty(false)
        .run()
        .unwrap();
}

#[test]
fn test_post_then_unpost() {
    Scenario::new("post_then_unpost")
        .from_fixture("default")
        .open(ItemType::Planning, "plan-1")
        .post()
        .assert_outcome(CommitOutcome::Committed)
        .assert_item("state", json!("scheduled"))
        .unpost()
        .assert_outcome(CommitOutcome::Committed)
        .assert_item("state", json!("killed"))
        .assert_item("pubstatus", json!("cancelled"))
        .assert(Assertion::ServerWrites(2))
        .run()
        .unwrap();
}

#[test]
fn test_save_unpost_kills_item() {
    Scenario::new("save_unpost")
        .from_fixture("default")
        .open(ItemType::Planning, "plan-1")
        .edit("ednote", json!("story dropped"))
        .save_unpost()
        .assert_outcome(CommitOutcome::Committed)
        .assert_server("plan-1", "state", json!("killed"))
        .assert_server("plan-1", "pubstatus", json!("cancelled"))
        .assert_server("plan-1", "ednote", json!("story dropped"))
        .run()
        .unwrap();
}

#[test]
fn test_create_new_event() {
    Scenario::new("create_new_event")
        .from_fixture("default")
        .open_new(ItemType::Event, None)
        .assert(Assertion::TempItemId)
        .assert_dirty(false)
        .edit("name", json!("Press conference"))
        .assert_dirty(true)
        .save()
        .assert_outcome(CommitOutcome::Committed)
        .assert(Assertion::ItemId("new-1".into()))
        .assert_dirty(false)
        .assert_server("new-1", "name", json!("Press conference"))
        .run()
        .unwrap();
}

#[test]
fn test_validation_blocks_commit() {
    Scenario::new("validation_blocks_commit")
        .from_fixture("default")
        .open_new(ItemType::Event, None)
        .save()
        .assert_outcome(CommitOutcome::Blocked)
        .assert(Assertion::SubmitFailed(true))
        .assert(Assertion::NotifiedContains("name is required".into()))
        .assert(Assertion::ServerWrites(0))
        .assert_state(SessionState::Ready)
        // Fixing the field opens the gate again
        .edit("name", json!("Press conference"))
        .save()
        .assert_outcome(CommitOutcome::Committed)
        .assert(Assertion::SubmitFailed(false))
        .run()
        .unwrap();
}

#[test]
fn test_slugline_too_long_blocks_save() {
    Scenario::new("slugline_too_long")
        .from_fixture("default")
        .open(ItemType::Planning, "plan-1")
        .edit("slugline", json!("A-SLUGLINE-FAR-TOO-LONG-FOR-THE-FORM"))
        .save()
        .assert_outcome(CommitOutcome::Blocked)
        .assert(Assertion::NotifiedContains("slugline is too long".into()))
        .assert_server("plan-1", "slugline", json!("ELECTION"))
        .run()
        .unwrap();
}

#[test]
fn test_add_coverages() {
    Scenario::new("add_coverages")
        .from_fixture("default")
        .open(ItemType::Planning, "plan-1")
        .add_coverage(json!({"planning": {"g2_content_type": "picture"}}))
        .assert_dirty(true)
        .save()
        .assert_outcome(CommitOutcome::Committed)
        .assert(Assertion::Custom(Box::new(|session: &mut EditingSession| {
            let coverages = session
                .diff()
                .get("coverages")
                .and_then(|v| v.as_array())
                .map(Vec::len);
            anyhow::ensure!(coverages == Some(2), "expected 2 coverages, got {:?}", coverages);
            Ok(())
        })))
        .run()
        .unwrap();
}
