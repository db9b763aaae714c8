//! Editing session lifecycle: open, edit, commit, partial save, teardown.

use crate::autosave::{AutosavePersistor, AutosaveStore};
use crate::collab::{ItemLoader, LogNotifier, Notifier, Persistence};
use crate::config::{Config, SessionConfig};
use crate::error::{EditError, Result};
use crate::lock::LockGuard;
use crate::reconcile::{apply_field, is_dirty, items_equal, merge_rehydrated, rebase_edits};
use crate::types::{
    is_bookkeeping_field, is_existing_item, pubstatus, workflow, CommitKind, Fields, Item,
    ItemType, SessionState, UpdateMethod, ValidationErrors, ID_FIELD,
};
use crate::validation::{run_validation, FormProfiles, ProfileValidator, Validator};
use crate::TimeProvider;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Options for a single edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Recompute the dirty flag after the edit.
    pub update_dirty: bool,
    /// Schedule an autosave of the new working copy.
    pub autosave: bool,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            update_dirty: true,
            autosave: true,
        }
    }
}

/// Options for save-family commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Ask for confirmation of series-wide changes (default: true).
    pub with_confirmation: bool,
    /// How an event save applies to its series.
    pub update_method: UpdateMethod,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            with_confirmation: true,
            update_method: UpdateMethod::default(),
        }
    }
}

/// A commit accepted by the validation gate, ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRequest {
    /// Which operation to run.
    pub kind: CommitKind,
    /// Payload built from the working copy.
    pub payload: Fields,
    /// Passed through to the save call.
    pub with_confirmation: bool,
}

impl CommitRequest {
    /// Sends the request to the persistence collaborator.
    pub fn dispatch(&self, persistence: &mut dyn Persistence) -> Result<Item> {
        match self.kind {
            CommitKind::Save | CommitKind::SaveAndPost | CommitKind::SaveUnpost => {
                persistence.save(&self.payload, self.with_confirmation)
            }
            CommitKind::Post => persistence.post(&self.payload),
            CommitKind::Unpost => persistence.unpost(&self.payload),
        }
    }
}

/// Result of asking to start a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitGate {
    /// The commit may proceed; the session is now submitting.
    Open(CommitRequest),
    /// Validation errors block the commit. Messages were sent to the notifier.
    Blocked,
    /// Another commit or partial save is in flight.
    Busy,
}

/// Outcome of a one-shot commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The server accepted the commit.
    Committed,
    /// Validation errors blocked the commit.
    Blocked,
    /// Another commit was in flight.
    Busy,
}

type ChangeListener = Box<dyn Fn(&Fields)>;
type CancelHandler = Box<dyn FnMut(Option<&Fields>)>;

/// Editing session for a single item.
///
/// The session owns the last accepted [`Item`], the working copy (diff) and
/// the validation results. Edits land in the working copy; commits go
/// through the validation gate and a [`Persistence`] collaborator; working
/// copies are autosaved on a trailing throttle so they survive a crash.
pub struct EditingSession {
    config: SessionConfig,
    item_type: Option<ItemType>,
    item_id: Option<String>,
    item: Option<Item>,
    initial_values: Option<Fields>,
    diff: Fields,
    errors: ValidationErrors,
    error_messages: Vec<String>,
    state: SessionState,
    dirty: bool,
    submit_failed: bool,
    pending_commit: Option<CommitKind>,
    commit_base: Option<Item>,
    autosave: AutosavePersistor,
    validator: Box<dyn Validator>,
    form_profiles: FormProfiles,
    notifier: Box<dyn Notifier>,
    on_change: Option<ChangeListener>,
    on_cancel: Option<CancelHandler>,
}

impl EditingSession {
    /// Creates an idle session with default collaborators.
    pub fn new(autosave: AutosavePersistor) -> Self {
        Self {
            config: SessionConfig::default(),
            item_type: None,
            item_id: None,
            item: None,
            initial_values: None,
            diff: Fields::new(),
            errors: ValidationErrors::new(),
            error_messages: Vec::new(),
            state: SessionState::Idle,
            dirty: false,
            submit_failed: false,
            pending_commit: None,
            commit_base: None,
            autosave,
            validator: Box::new(ProfileValidator),
            form_profiles: FormProfiles::default(),
            notifier: Box::new(LogNotifier),
            on_change: None,
            on_cancel: None,
        }
    }

    /// Creates an idle session from configuration.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn AutosaveStore>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self::new(AutosavePersistor::from_config(&config.autosave, store, clock))
            .with_config(config.session.clone())
    }

    /// Sets session behaviour.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Sets the form profiles passed to the validator.
    pub fn with_form_profiles(mut self, profiles: FormProfiles) -> Self {
        self.form_profiles = profiles;
        self
    }

    /// Replaces the error notifier.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Registers a listener called with the working copy after every change.
    pub fn with_change_listener(mut self, listener: impl Fn(&Fields) + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    /// Registers the handler called when the editor is cancelled.
    ///
    /// It receives the last accepted item, or the initial values of a new item.
    pub fn with_cancel_handler(mut self, handler: impl FnMut(Option<&Fields>) + 'static) -> Self {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    // Opening

    /// Opens an item through the loader and resumes any autosaved edits.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::LoadFailed`] if the loader rejects; the session
    /// is then `Idle`.
    pub fn open(
        &mut self,
        item_id: &str,
        item_type: ItemType,
        loader: &mut dyn ItemLoader,
    ) -> Result<()> {
        self.begin_open(item_id, item_type)?;
        let loaded = loader.load(item_id, item_type);
        self.finish_open(loaded)
    }

    /// Enters `Loading` for an item. Pending autosave of the previous item
    /// is written first.
    pub fn begin_open(&mut self, item_id: &str, item_type: ItemType) -> Result<()> {
        self.autosave.flush();
        self.set_state(SessionState::Loading)?;

        self.reset_working_state();
        self.item = None;
        self.initial_values = None;
        self.item_type = Some(item_type);
        self.item_id = Some(item_id.to_string());
        debug!(item_type = %item_type, item_id, "opening item");
        Ok(())
    }

    /// Settles a load started by [`begin_open`](Self::begin_open).
    pub fn finish_open(&mut self, loaded: Result<Item>) -> Result<()> {
        if self.state != SessionState::Loading {
            return Err(EditError::InvalidStateTransition {
                from: self.state.to_string(),
                to: SessionState::Ready.to_string(),
            });
        }

        match loaded {
            Ok(item) => {
                self.diff = item.fields().clone();
                self.item = Some(item);
                self.rehydrate();
                self.dirty = is_dirty(&self.diff, self.item.as_ref());
                self.set_state(SessionState::Ready)?;
                self.notify_change();
                Ok(())
            }
            Err(e) => {
                let item_type = self.item_type.take().map(|t| t.to_string()).unwrap_or_default();
                let item_id = self.item_id.take().unwrap_or_default();
                warn!(item_type = %item_type, item_id = %item_id, error = %e, "item load failed");
                self.set_state(SessionState::Idle)?;
                Err(EditError::LoadFailed {
                    item_type,
                    item_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Opens a session for an item the server does not know yet.
    ///
    /// Initial values without an `_id` get a temporary one. The session
    /// starts dirty only when the initial values describe an existing item,
    /// as when duplicating, or when autosaved edits were resumed.
    pub fn open_new(&mut self, item_type: ItemType, initial_values: Option<Fields>) -> Result<()> {
        let mut initial = initial_values.unwrap_or_default();
        let existing = is_existing_item(&initial, &self.config.temp_id_prefix);
        let item_id = match initial.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("{}{}", self.config.temp_id_prefix, Uuid::new_v4());
                initial.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        self.begin_open(&item_id, item_type)?;
        self.diff = initial.clone();
        self.initial_values = Some(initial);
        let resumed = self.rehydrate();
        self.dirty = existing || resumed;
        self.set_state(SessionState::Ready)?;
        self.notify_change();
        Ok(())
    }

    fn rehydrate(&mut self) -> bool {
        let (Some(item_type), Some(item_id)) = (self.item_type, self.item_id.as_deref()) else {
            return false;
        };

        let resumed = match self.autosave.load(item_type, item_id) {
            Some(fields) => {
                info!(item_type = %item_type, item_id, "resuming autosaved edits");
                merge_rehydrated(&mut self.diff, fields);
                true
            }
            None => false,
        };
        self.revalidate();
        resumed
    }

    // Editing

    /// Applies an edit with default options.
    ///
    /// With a field path the value is merged at that path; without one the
    /// value replaces the working copy and must be an object.
    pub fn apply_change(&mut self, field: Option<&str>, value: Value) {
        self.apply_change_with(field, value, ChangeOptions::default());
    }

    /// Applies an edit.
    pub fn apply_change_with(&mut self, field: Option<&str>, value: Value, options: ChangeOptions) {
        if !self.accepts_edits() {
            debug!(state = %self.state, "ignoring edit while not open");
            return;
        }

        match field {
            Some(path) => {
                if !apply_field(&mut self.diff, path, value) {
                    warn!(path, "ignoring edit at unusable field path");
                    return;
                }
            }
            None => match value {
                Value::Object(fields) => self.diff = fields,
                other => {
                    warn!(value = %other, "ignoring non-object replacement of working copy");
                    return;
                }
            },
        }

        self.revalidate();
        if options.update_dirty {
            self.dirty = is_dirty(&self.diff, self.item.as_ref());
        }
        if options.autosave {
            self.schedule_autosave();
        }
        self.notify_change();
    }

    /// Appends a coverage to the working copy.
    pub fn add_coverage(&mut self, coverage: Value) {
        let mut coverages = match self.diff.get("coverages") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        coverages.push(coverage);
        self.apply_change(Some("coverages"), Value::Array(coverages));
    }

    /// Drives the autosave throttle. Returns true if a write was attempted.
    pub fn tick(&mut self) -> bool {
        self.autosave.poll()
    }

    // Commits

    /// Runs the validation gate and, if it opens, enters `Submitting`.
    ///
    /// The returned request carries the payload to dispatch; settle it with
    /// [`complete_commit`](Self::complete_commit).
    pub fn begin_commit(&mut self, kind: CommitKind, options: CommitOptions) -> Result<CommitGate> {
        match self.state {
            SessionState::Submitting | SessionState::PartialSaving => {
                debug!(kind = %kind, "commit refused, another is in flight");
                return Ok(CommitGate::Busy);
            }
            SessionState::Ready => {}
            other => {
                return Err(EditError::InvalidStateTransition {
                    from: other.to_string(),
                    to: SessionState::Submitting.to_string(),
                })
            }
        }

        self.revalidate();
        if !self.errors.is_empty() {
            self.submit_failed = true;
            self.notifier.errors(&self.error_messages);
            debug!(kind = %kind, errors = self.errors.len(), "commit blocked by validation");
            return Ok(CommitGate::Blocked);
        }

        self.set_state(SessionState::Submitting)?;
        self.submit_failed = false;
        self.pending_commit = Some(kind);
        self.commit_base = Some(Item::new(self.diff.clone()));

        Ok(CommitGate::Open(CommitRequest {
            kind,
            payload: self.commit_payload(kind, options.update_method),
            with_confirmation: options.with_confirmation,
        }))
    }

    /// Settles the commit in flight.
    ///
    /// On success the returned item becomes the accepted item and the working
    /// copy. Edits made while the commit was in flight are rebased onto it
    /// and stay dirty; the queued autosave is dropped only when none were
    /// made. On failure the working copy and dirty flag are kept.
    pub fn complete_commit(&mut self, result: Result<Item>) -> Result<()> {
        let Some(kind) = self.pending_commit.take() else {
            return Err(EditError::NoCommitInFlight);
        };
        let base = self.commit_base.take();
        self.set_state(SessionState::Ready)?;

        match result {
            Ok(item) => {
                if let Some(id) = item.id() {
                    self.item_id = Some(id.to_string());
                }
                self.diff = rebase_edits(base.as_ref(), &self.diff, &item);
                self.item = Some(item);
                self.dirty = is_dirty(&self.diff, self.item.as_ref());
                if self.dirty {
                    self.schedule_autosave();
                } else {
                    self.autosave.discard();
                }
                self.revalidate();
                self.notify_change();
                info!(kind = %kind, item_id = ?self.item_id, dirty = self.dirty, "commit accepted");
                Ok(())
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "commit rejected");
                Err(EditError::CommitFailed {
                    kind: kind.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Saves the working copy.
    pub fn save(
        &mut self,
        persistence: &mut dyn Persistence,
        options: CommitOptions,
    ) -> Result<CommitOutcome> {
        self.commit(CommitKind::Save, persistence, options)
    }

    /// Saves the working copy forced to scheduled/usable.
    pub fn save_and_post(
        &mut self,
        persistence: &mut dyn Persistence,
        options: CommitOptions,
    ) -> Result<CommitOutcome> {
        self.commit(CommitKind::SaveAndPost, persistence, options)
    }

    /// Saves the working copy forced to killed/cancelled.
    pub fn save_unpost(&mut self, persistence: &mut dyn Persistence) -> Result<CommitOutcome> {
        self.commit(CommitKind::SaveUnpost, persistence, CommitOptions::default())
    }

    /// Posts the working copy.
    pub fn post(&mut self, persistence: &mut dyn Persistence) -> Result<CommitOutcome> {
        self.commit(CommitKind::Post, persistence, CommitOptions::default())
    }

    /// Unposts the working copy.
    pub fn unpost(&mut self, persistence: &mut dyn Persistence) -> Result<CommitOutcome> {
        self.commit(CommitKind::Unpost, persistence, CommitOptions::default())
    }

    fn commit(
        &mut self,
        kind: CommitKind,
        persistence: &mut dyn Persistence,
        options: CommitOptions,
    ) -> Result<CommitOutcome> {
        match self.begin_commit(kind, options)? {
            CommitGate::Blocked => Ok(CommitOutcome::Blocked),
            CommitGate::Busy => Ok(CommitOutcome::Busy),
            CommitGate::Open(request) => {
                let result = request.dispatch(persistence);
                self.complete_commit(result)?;
                Ok(CommitOutcome::Committed)
            }
        }
    }

    fn commit_payload(&self, kind: CommitKind, update_method: UpdateMethod) -> Fields {
        let mut payload = self.diff.clone();

        let forced = match kind {
            CommitKind::SaveAndPost => Some((workflow::SCHEDULED, pubstatus::USABLE)),
            CommitKind::SaveUnpost => Some((workflow::KILLED, pubstatus::CANCELLED)),
            _ => None,
        };
        if let Some((state, status)) = forced {
            payload.insert("state".to_string(), Value::from(state));
            payload.insert("pubstatus".to_string(), Value::from(status));
        }

        if kind.is_save() && self.item_type == Some(ItemType::Event) {
            payload.insert("update_method".to_string(), Value::from(update_method.as_str()));
        }
        payload
    }

    // Partial save

    /// Validates `updates` and, if they pass, enters `PartialSaving`.
    ///
    /// Returns false without a state change when the session is not ready
    /// or validation fails; failures are sent to the notifier. The caller
    /// performs the write and then reports the updated item.
    pub fn start_partial_save(&mut self, updates: &Fields) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        let Some(item_type) = self.item_type else {
            return false;
        };

        let (errors, messages) =
            run_validation(self.validator.as_ref(), item_type, updates, &self.form_profiles);
        if !errors.is_empty() {
            self.submit_failed = true;
            self.notifier.errors(&messages);
            return false;
        }

        if self.set_state(SessionState::PartialSaving).is_err() {
            return false;
        }
        self.submit_failed = false;
        true
    }

    /// Accepts the item written by a partial save.
    ///
    /// Edits made while the partial save was in flight are rebased onto the
    /// updated item and dirty is recomputed against it.
    pub fn finalize_partial_save(&mut self, updated: Item) -> Result<()> {
        if self.state != SessionState::PartialSaving {
            return Err(EditError::InvalidStateTransition {
                from: self.state.to_string(),
                to: SessionState::Ready.to_string(),
            });
        }

        self.diff = rebase_edits(self.item.as_ref(), &self.diff, &updated);
        self.item = Some(updated);
        self.set_state(SessionState::Ready)?;
        self.dirty = is_dirty(&self.diff, self.item.as_ref());
        self.revalidate();
        self.notify_change();
        Ok(())
    }

    /// Leaves `PartialSaving` after the partial write was rejected.
    pub fn fail_partial_save(&mut self) -> Result<()> {
        if self.state != SessionState::PartialSaving {
            return Err(EditError::InvalidStateTransition {
                from: self.state.to_string(),
                to: SessionState::Ready.to_string(),
            });
        }
        self.set_state(SessionState::Ready)
    }

    /// Accepts a newer version of the item pushed by the server.
    ///
    /// During a partial save the update completes it. Otherwise a clean
    /// session takes the new item wholesale and a dirty one keeps its local
    /// edits on top of it. Semantically equal updates only refresh
    /// bookkeeping fields.
    pub fn receive_item_update(&mut self, updated: Item) -> Result<()> {
        match self.state {
            SessionState::PartialSaving => return self.finalize_partial_save(updated),
            SessionState::Ready | SessionState::Submitting => {}
            other => {
                debug!(state = %other, "ignoring item update while not open");
                return Ok(());
            }
        }

        if items_equal(self.item.as_ref().map(Item::fields), Some(updated.fields())) {
            for (key, value) in updated.fields() {
                if is_bookkeeping_field(key) {
                    self.diff.insert(key.clone(), value.clone());
                }
            }
            self.item = Some(updated);
            return Ok(());
        }

        if self.dirty {
            self.diff = rebase_edits(self.item.as_ref(), &self.diff, &updated);
        } else {
            self.diff = updated.fields().clone();
        }
        self.item = Some(updated);
        self.dirty = is_dirty(&self.diff, self.item.as_ref());
        self.revalidate();
        self.notify_change();
        Ok(())
    }

    // Teardown

    /// Cancels editing.
    ///
    /// Pending autosave is written first. Working state is torn down for new
    /// items, or always when configured. The cancel handler is then called
    /// and the session closes.
    pub fn cancel(&mut self) -> Result<()> {
        self.autosave.flush();

        let existing = self
            .item
            .as_ref()
            .is_some_and(|item| is_existing_item(item.fields(), &self.config.temp_id_prefix));
        if self.config.teardown_on_cancel || !existing {
            self.reset_working_state();
        }

        let fields = self
            .item
            .as_ref()
            .map(|item| item.fields().clone())
            .or_else(|| self.initial_values.clone());
        if let Some(handler) = self.on_cancel.as_mut() {
            handler(fields.as_ref());
        }

        self.set_state(SessionState::Closed)
    }

    /// Closes the session, clearing the working copy but keeping the item.
    pub fn close(&mut self) -> Result<()> {
        self.autosave.flush();
        self.reset_working_state();
        self.set_state(SessionState::Closed)
    }

    fn reset_working_state(&mut self) {
        self.diff = Fields::new();
        self.errors.clear();
        self.error_messages.clear();
        self.submit_failed = false;
        self.dirty = false;
        self.pending_commit = None;
        self.commit_base = None;
    }

    // Status

    /// Returns true if the item must be presented read-only.
    pub fn is_read_only(&self, guard: &LockGuard<'_>) -> bool {
        match self.item_type {
            Some(item_type) => {
                guard.is_read_only(item_type, self.item.as_ref(), &self.config.temp_id_prefix)
            }
            None => false,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true if the working copy differs from the accepted item.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true while a commit or partial save is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(
            self.state,
            SessionState::Submitting | SessionState::PartialSaving
        )
    }

    /// Returns true while a partial save is in flight.
    pub fn is_partial_saving(&self) -> bool {
        self.state == SessionState::PartialSaving
    }

    /// Returns true if the last commit attempt was blocked by validation.
    pub fn submit_failed(&self) -> bool {
        self.submit_failed
    }

    /// Returns the working copy.
    pub fn diff(&self) -> &Fields {
        &self.diff
    }

    /// Returns the last accepted item.
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    /// Returns the initial values of a new item.
    pub fn initial_values(&self) -> Option<&Fields> {
        self.initial_values.as_ref()
    }

    /// Returns the open item's id.
    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Returns the open item's type.
    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    /// Returns the current validation errors.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns the current validation messages.
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// Returns true if an autosave write is queued.
    pub fn has_pending_autosave(&self) -> bool {
        self.autosave.has_pending()
    }

    pub(crate) fn flush_autosave(&mut self) {
        self.autosave.flush();
    }

    fn accepts_edits(&self) -> bool {
        matches!(
            self.state,
            SessionState::Ready | SessionState::Submitting | SessionState::PartialSaving
        )
    }

    fn revalidate(&mut self) {
        let Some(item_type) = self.item_type else {
            return;
        };
        let (errors, messages) =
            run_validation(self.validator.as_ref(), item_type, &self.diff, &self.form_profiles);
        self.errors = errors;
        self.error_messages = messages;
    }

    fn schedule_autosave(&mut self) {
        if let (Some(item_type), Some(item_id)) = (self.item_type, self.item_id.as_deref()) {
            self.autosave.schedule(item_type, item_id, &self.diff);
        }
    }

    fn notify_change(&self) {
        if let Some(listener) = &self.on_change {
            listener(&self.diff);
        }
    }

    /// Transitions session state with validation.
    fn set_state(&mut self, new_state: SessionState) -> Result<()> {
        if !self.is_valid_transition(new_state) {
            return Err(EditError::InvalidStateTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }
        self.state = new_state;
        Ok(())
    }

    fn is_valid_transition(&self, new_state: SessionState) -> bool {
        use SessionState::*;

        match (self.state, new_state) {
            (_, Closed) => true,

            (Idle, Loading) | (Ready, Loading) | (Closed, Loading) => true,

            (Loading, Ready) | (Loading, Idle) => true,

            (Ready, Submitting) | (Ready, PartialSaving) => true,

            (Submitting, Ready) | (PartialSaving, Ready) => true,

            _ => false,
        }
    }
}

// Manual Debug implementation to skip collaborator fields
impl std::fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("item_type", &self.item_type)
            .field("item_id", &self.item_id)
            .field("state", &self.state)
            .field("dirty", &self.dirty)
            .field("submit_failed", &self.submit_failed)
            .field("pending_commit", &self.pending_commit)
            .field("errors", &self.errors)
            .field("autosave", &self.autosave)
            .finish()
    }
}
