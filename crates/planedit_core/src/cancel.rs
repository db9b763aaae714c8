//! Cancel confirmation for sessions with unsaved edits.
//!
//! Cancelling a dirty session does not discard anything by itself. The
//! caller gets a [`CancelPrompt`] naming the continuations that make sense
//! for the item, shows it, and passes the user's answer back to
//! [`EditingSession::resolve_cancel`].

use crate::collab::Persistence;
use crate::error::{EditError, Result};
use crate::session::{CommitOptions, CommitOutcome, EditingSession};
use crate::types::ItemType;
use std::fmt;
use tracing::debug;

/// User's answer to a cancel prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelChoice {
    /// Discard the edits. Autosave keeps the last snapshot.
    Ignore,
    /// Save, then close.
    Save,
    /// Save and post, then close.
    SaveAndPost,
}

impl fmt::Display for CancelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ignore => "ignore",
            Self::Save => "save",
            Self::SaveAndPost => "save and post",
        };
        f.write_str(name)
    }
}

/// Question to put to the user before closing a dirty session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelPrompt {
    /// Item being edited.
    pub item_id: String,
    /// Type of the item.
    pub item_type: ItemType,
    /// Offer to save first.
    pub can_save: bool,
    /// Offer to save and post first.
    pub can_save_and_post: bool,
}

impl CancelPrompt {
    /// Returns true if the prompt offers `choice`.
    pub fn allows(&self, choice: CancelChoice) -> bool {
        match choice {
            CancelChoice::Ignore => true,
            CancelChoice::Save => self.can_save,
            CancelChoice::SaveAndPost => self.can_save_and_post,
        }
    }
}

/// Result of asking to cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelDecision {
    /// Nothing to confirm; the session is closed.
    Cancelled,
    /// Unsaved edits; ask the user.
    Prompt(CancelPrompt),
    /// A commit or partial save is in flight; nothing was cancelled.
    Busy,
}

impl EditingSession {
    /// Cancels a clean session, or returns a prompt for a dirty one.
    ///
    /// A dirty session writes its pending autosave before prompting, so the
    /// latest edits survive whatever the user decides. While a commit or
    /// partial save is in flight the session stays open and
    /// [`CancelDecision::Busy`] is returned.
    pub fn request_cancel(&mut self) -> Result<CancelDecision> {
        if self.is_submitting() {
            debug!(state = %self.state(), "cancel deferred, write in flight");
            return Ok(CancelDecision::Busy);
        }
        if !self.is_dirty() {
            self.cancel()?;
            return Ok(CancelDecision::Cancelled);
        }

        self.flush_autosave();

        let target = self.item_type().zip(self.item_id().map(str::to_string));
        let Some((item_type, item_id)) = target else {
            self.cancel()?;
            return Ok(CancelDecision::Cancelled);
        };

        let killed = self.item().is_some_and(|item| item.is_killed());
        let has_errors = !self.errors().is_empty();

        Ok(CancelDecision::Prompt(CancelPrompt {
            item_id,
            item_type,
            can_save: !killed && !has_errors,
            can_save_and_post: killed && !has_errors,
        }))
    }

    /// Runs the chosen continuation, then cancels.
    ///
    /// The session is cancelled even when the continuation's commit is
    /// blocked or rejected; its outcome is returned to the caller. While a
    /// commit or partial save is in flight nothing runs, the session stays
    /// open and `Some(CommitOutcome::Busy)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ChoiceUnavailable`] if the prompt did not offer
    /// `choice` or belongs to another item. The session is left untouched.
    pub fn resolve_cancel(
        &mut self,
        choice: CancelChoice,
        prompt: &CancelPrompt,
        persistence: &mut dyn Persistence,
        options: CommitOptions,
    ) -> Result<Option<CommitOutcome>> {
        if !prompt.allows(choice) {
            return Err(EditError::ChoiceUnavailable(choice.to_string()));
        }
        if self.item_id() != Some(prompt.item_id.as_str()) {
            return Err(EditError::ChoiceUnavailable(format!(
                "{} (prompt was for {})",
                choice, prompt.item_id
            )));
        }

        if self.is_submitting() {
            debug!(choice = %choice, item_id = %prompt.item_id, "cancel deferred, write in flight");
            return Ok(Some(CommitOutcome::Busy));
        }

        debug!(choice = %choice, item_id = %prompt.item_id, "resolving cancel");
        let outcome = match choice {
            CancelChoice::Ignore => None,
            CancelChoice::Save => Some(self.save(persistence, options)),
            CancelChoice::SaveAndPost => Some(self.save_and_post(persistence, options)),
        };

        self.cancel()?;
        outcome.transpose()
    }
}
