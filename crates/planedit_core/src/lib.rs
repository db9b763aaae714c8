//! Planedit Core Library
//!
//! Editing sessions for planning items and events, providing:
//! - A working copy (diff) reconciled against the last accepted item
//! - Validation-gated commits (save, post, unpost) and partial saves
//! - Throttled crash-recovery autosave with resume on reopen
//! - Read-only derivation from locks and privileges
//!
//! # Quick Start
//!
//! ```
//! use planedit_core::{
//!     AutosavePersistor, AutosaveStore, EditingSession, ItemType, MemoryAutosaveStore,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(MemoryAutosaveStore::new());
//! let persistor = AutosavePersistor::new(
//!     store.clone(),
//!     Duration::from_millis(3000),
//!     Arc::new(|| 0i64),
//! );
//! let mut session = EditingSession::new(persistor);
//!
//! session.open_new(ItemType::Event, None).unwrap();
//! session.apply_change(Some("name"), json!("Budget briefing"));
//! assert!(session.is_dirty());
//!
//! // Cancelling writes the pending autosave before closing.
//! let id = session.item_id().unwrap().to_string();
//! session.cancel().unwrap();
//! let record = store.load(ItemType::Event, &id).unwrap().unwrap();
//! assert_eq!(record.fields["name"], json!("Budget briefing"));
//! ```
//!
//! # Features
//!
//! ## Dirty Tracking
//!
//! Internal (`_`) and lock (`lock_`) fields never make a session dirty:
//!
//! ```
//! use planedit_core::{is_dirty, Item};
//! use serde_json::json;
//!
//! let item = Item::from_value(json!({"_id": "p1", "slugline": "B"})).unwrap();
//! let diff = json!({"_id": "p1", "_etag": "2", "slugline": "B"});
//!
//! assert!(!is_dirty(diff.as_object().unwrap(), Some(&item)));
//! ```

mod autosave;
mod cancel;
mod collab;
mod config;
mod error;
mod lock;
mod reconcile;
mod schema;
mod session;
mod store;
mod throttle;
mod types;
mod validation;

pub use autosave::{project_record, AutosavePersistor, AutosaveStore, MemoryAutosaveStore};
pub use cancel::{CancelChoice, CancelDecision, CancelPrompt};
pub use collab::{ItemLoader, LogNotifier, Notifier, Persistence};
pub use config::{AutosaveConfig, Config, SessionConfig, StorageConfig, CONFIG_FILE};
pub use error::{EditError, Result};
pub use lock::{
    Capability, LockGuard, LockService, LockState, LockTable, LockedItems, PrivilegeCapability,
    Privileges, UserSession, EDIT_ACTION,
};
pub use reconcile::{
    apply_field, is_dirty, items_equal, merge_rehydrated, rebase_edits, semantic_projection,
};
pub use schema::{format_instant, parse_instant, FieldRule, FieldTransform, ItemSchema};
pub use session::{
    ChangeOptions, CommitGate, CommitOptions, CommitOutcome, CommitRequest, EditingSession,
};
pub use store::{RedbAutosaveStore, AUTOSAVE_SCHEMA_VERSION};
pub use throttle::Throttle;
pub use types::*;
pub use validation::{
    run_validation, FieldProfile, FormProfile, FormProfiles, ProfileValidator, Validator,
};

/// Time provider trait for testing.
///
/// Allows injecting controlled time into autosave throttling.
pub trait TimeProvider: Send + Sync {
    /// Returns the current Unix timestamp in milliseconds.
    fn now_millis(&self) -> i64;
}

impl<F> TimeProvider for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}

/// Wall-clock time provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeProvider for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
