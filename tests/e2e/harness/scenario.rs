use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use planedit_core::{CommitOutcome, ItemType, SessionState, UpdateMethod};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Fluent DSL for building test scenarios
pub struct Scenario {
    name: String,
    fixture: Option<String>,
    initial_files: HashMap<String, Vec<u8>>,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fixture: None,
            initial_files: HashMap::new(),
            steps: Vec::new(),
        }
    }

    // ===== Initial setup =====

    /// Add a single file to initial workspace
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.initial_files
            .insert(path.to_string(), content.to_vec());
        self
    }

    /// Load initial workspace from fixtures
    pub fn from_fixture(mut self, fixture_name: &str) -> Self {
        self.fixture = Some(fixture_name.to_string());
        self
    }

    // ===== Editor actions =====

    /// Open an existing item
    pub fn open(mut self, item_type: ItemType, item_id: &str) -> Self {
        self.steps.push(ScenarioStep::OpenItem {
            item_id: item_id.to_string(),
            item_type,
        });
        self
    }

    /// Open an editor for a new item
    pub fn open_new(mut self, item_type: ItemType, initial_values: Option<Value>) -> Self {
        self.steps.push(ScenarioStep::OpenNew {
            item_type,
            initial_values,
        });
        self
    }

    /// Edit a field path in the working copy
    pub fn edit(mut self, field: &str, value: Value) -> Self {
        self.steps.push(ScenarioStep::Edit {
            field: field.to_string(),
            value,
        });
        self
    }

    /// Append a coverage
    pub fn add_coverage(mut self, coverage: Value) -> Self {
        self.steps.push(ScenarioStep::AddCoverage { coverage });
        self
    }

    /// Save the working copy
    pub fn save(self) -> Self {
        self.save_with(UpdateMethod::default())
    }

    /// Save an event with a series update method
    pub fn save_with(mut self, update_method: UpdateMethod) -> Self {
        self.steps.push(ScenarioStep::Save { update_method });
        self
    }

    /// Save and post
    pub fn save_and_post(mut self) -> Self {
        self.steps.push(ScenarioStep::SaveAndPost);
        self
    }

    /// Save and unpost
    pub fn save_unpost(mut self) -> Self {
        self.steps.push(ScenarioStep::SaveUnpost);
        self
    }

    /// Post without saving
    pub fn post(mut self) -> Self {
        self.steps.push(ScenarioStep::Post);
        self
    }

    /// Unpost without saving
    pub fn unpost(mut self) -> Self {
        self.steps.push(ScenarioStep::Unpost);
        self
    }

    /// Cancel the editor
    pub fn cancel(mut self) -> Self {
        self.steps.push(ScenarioStep::Cancel);
        self
    }

    /// Close the editor
    pub fn close(mut self) -> Self {
        self.steps.push(ScenarioStep::Close);
        self
    }

    // ===== Partial saves =====

    /// Start a partial save of the given fields
    pub fn start_partial_save(mut self, updates: Value) -> Self {
        self.steps.push(ScenarioStep::StartPartialSave { updates });
        self
    }

    /// Server accepts the partial save in flight
    pub fn finish_partial_save(mut self) -> Self {
        self.steps.push(ScenarioStep::FinishPartialSave);
        self
    }

    /// Server rejects the partial save in flight
    pub fn fail_partial_save(mut self) -> Self {
        self.steps.push(ScenarioStep::FailPartialSave);
        self
    }

    // ===== Server actions =====

    /// Reject the next commit
    pub fn server_fails_next(mut self, reason: &str) -> Self {
        self.steps.push(ScenarioStep::FailNextCommit {
            reason: reason.to_string(),
        });
        self
    }

    /// Another user changes a field; the session receives the update
    pub fn server_updates(mut self, item_id: &str, field: &str, value: Value) -> Self {
        self.steps.push(ScenarioStep::ServerUpdate {
            item_id: item_id.to_string(),
            field: field.to_string(),
            value,
        });
        self
    }

    /// The server re-sends an item with only a new etag
    pub fn server_touches(mut self, item_id: &str) -> Self {
        self.steps.push(ScenarioStep::ServerTouch {
            item_id: item_id.to_string(),
        });
        self
    }

    /// Record an edit lock on an item
    pub fn lock(mut self, item_id: &str, user: &str, session: &str) -> Self {
        self.steps.push(ScenarioStep::LockItem {
            item_id: item_id.to_string(),
            user: user.to_string(),
            session: session.to_string(),
        });
        self
    }

    // ===== Time manipulation =====

    /// Wait for a duration, then let the editor timer fire
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(ScenarioStep::Wait { duration });
        self
    }

    /// Wait for milliseconds
    pub fn wait_millis(self, millis: u64) -> Self {
        self.wait(Duration::from_millis(millis))
    }

    /// Let the editor timer fire without advancing time
    pub fn tick(mut self) -> Self {
        self.steps.push(ScenarioStep::Tick);
        self
    }

    // ===== Crash simulation =====

    /// Simulate crash (drop the session without flushing)
    pub fn crash(mut self) -> Self {
        self.steps.push(ScenarioStep::Crash);
        self
    }

    /// Restart after crash
    pub fn restart(mut self) -> Self {
        self.steps.push(ScenarioStep::Restart);
        self
    }

    // ===== Assertions =====

    /// Add a general assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert session is in specific state
    pub fn assert_state(self, state: SessionState) -> Self {
        self.assert(Assertion::SessionState(state))
    }

    /// Assert the dirty flag
    pub fn assert_dirty(self, dirty: bool) -> Self {
        self.assert(Assertion::Dirty(dirty))
    }

    /// Assert a working-copy field
    pub fn assert_diff(self, field: &str, value: Value) -> Self {
        self.assert(Assertion::DiffField {
            field: field.to_string(),
            value,
        })
    }

    /// Assert a field of the accepted item
    pub fn assert_item(self, field: &str, value: Value) -> Self {
        self.assert(Assertion::ItemField {
            field: field.to_string(),
            value,
        })
    }

    /// Assert a field of the stored autosave record
    pub fn assert_autosaved(self, field: &str, value: Value) -> Self {
        self.assert(Assertion::AutosaveField {
            field: field.to_string(),
            value,
        })
    }

    /// Assert no autosave record exists for the open item
    pub fn assert_no_autosave(self) -> Self {
        self.assert(Assertion::NoAutosave)
    }

    /// Assert the outcome of the last commit
    pub fn assert_outcome(self, outcome: CommitOutcome) -> Self {
        self.assert(Assertion::LastOutcome(outcome))
    }

    /// Assert a field of an item as the server holds it
    pub fn assert_server(self, item_id: &str, field: &str, value: Value) -> Self {
        self.assert(Assertion::ServerField {
            item_id: item_id.to_string(),
            field: field.to_string(),
            value,
        })
    }

    // ===== Execution =====

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner =
            match ScenarioRunner::new(self.fixture.as_deref(), self.initial_files.clone()) {
                Ok(r) => r,
                Err(e) => {
                    return ScenarioResult {
                        name: self.name.clone(),
                        success: false,
                        steps_executed: 0,
                        failure_step: Some(0),
                        error: Some(format!("Failed to create runner: {}", e)),
                    }
                }
            };

        match runner.execute(&self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: self.steps.len(),
                failure_step: None,
                error: None,
            },
            Err(e) => {
                // Try to determine which step failed
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
