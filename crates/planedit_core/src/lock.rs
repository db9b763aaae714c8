//! Lock ownership and edit capability checks.
//!
//! An existing item may only be edited by the session that holds its edit
//! lock, by a user with the privilege for the item type, and only while the
//! lock is not restricted. Items not yet known to the server are always
//! editable.

use crate::types::{is_existing_item, workflow, Item, ItemType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Lock action that grants editing.
pub const EDIT_ACTION: &str = "edit";

/// Ownership descriptor of an item lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    /// User holding the lock.
    pub user: String,
    /// Session holding the lock.
    pub session: String,
    /// Action the lock was taken for, e.g. `edit`.
    pub action: String,
    /// Set when the lock is held under a restricted condition.
    #[serde(default)]
    pub restricted: bool,
}

impl LockState {
    /// Creates an unrestricted lock.
    pub fn new(user: impl Into<String>, session: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            session: session.into(),
            action: action.into(),
            restricted: false,
        }
    }

    /// Reads a lock recorded on the item's own `lock_*` fields.
    pub fn from_item(item: &Item) -> Option<Self> {
        let field = |name: &str| item.get(name).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            user: field("lock_user")?,
            session: field("lock_session")?,
            action: field("lock_action").unwrap_or_default(),
            restricted: false,
        })
    }
}

/// Identity of the current user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Current user.
    pub user_id: String,
    /// Current session.
    pub session_id: String,
}

impl UserSession {
    /// Creates a session identity.
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Privileges granted to the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privileges(BTreeSet<String>);

impl Privileges {
    /// Returns true if the privilege is granted.
    pub fn has(&self, privilege: &str) -> bool {
        self.0.contains(privilege)
    }
}

impl<S: Into<String>> FromIterator<S> for Privileges {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Locks currently known to the client, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedItems(HashMap<String, LockState>);

impl LockedItems {
    /// Records a lock for an item.
    pub fn insert(&mut self, item_id: impl Into<String>, lock: LockState) {
        self.0.insert(item_id.into(), lock);
    }

    /// Returns the lock recorded for an item.
    pub fn get(&self, item_id: &str) -> Option<&LockState> {
        self.0.get(item_id)
    }
}

/// Lock queries.
pub trait LockService {
    /// Returns the lock on `item`, if any.
    fn get_lock(&self, item: &Item, locked: &LockedItems) -> Option<LockState>;

    /// Returns true if the lock on `item` is restricted for `session`.
    fn is_lock_restricted(&self, item: &Item, session: &UserSession, locked: &LockedItems) -> bool;
}

/// Edit capability check.
pub trait Capability {
    /// Returns true if `session` may edit `item`.
    fn can_edit(
        &self,
        item_type: ItemType,
        item: &Item,
        session: &UserSession,
        privileges: &Privileges,
        locked: &LockedItems,
    ) -> bool;
}

/// Lock lookup against the known lock table, falling back to the item's
/// own lock fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockTable;

impl LockService for LockTable {
    fn get_lock(&self, item: &Item, locked: &LockedItems) -> Option<LockState> {
        item.id()
            .and_then(|id| locked.get(id).cloned())
            .or_else(|| LockState::from_item(item))
    }

    fn is_lock_restricted(&self, item: &Item, session: &UserSession, locked: &LockedItems) -> bool {
        match self.get_lock(item, locked) {
            Some(lock) => {
                lock.restricted || lock.user != session.user_id || lock.session != session.session_id
            }
            None => false,
        }
    }
}

/// Capability driven by per-type privileges and workflow state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeCapability;

impl PrivilegeCapability {
    /// Privilege needed to edit an item type.
    pub fn required_privilege(item_type: ItemType) -> &'static str {
        match item_type {
            ItemType::Event => "planning_event_management",
            ItemType::Planning => "planning_planning_management",
        }
    }
}

impl Capability for PrivilegeCapability {
    fn can_edit(
        &self,
        item_type: ItemType,
        item: &Item,
        _session: &UserSession,
        privileges: &Privileges,
        _locked: &LockedItems,
    ) -> bool {
        privileges.has(Self::required_privilege(item_type))
            && !matches!(item.state(), Some(workflow::KILLED) | Some(workflow::SPIKED))
    }
}

/// Derives the read-only flag of an editor from locks and capabilities.
pub struct LockGuard<'a> {
    locks: &'a dyn LockService,
    capability: &'a dyn Capability,
    session: &'a UserSession,
    privileges: &'a Privileges,
    locked: &'a LockedItems,
}

impl<'a> LockGuard<'a> {
    /// Creates a guard using [`LockTable`] and [`PrivilegeCapability`].
    pub fn new(session: &'a UserSession, privileges: &'a Privileges, locked: &'a LockedItems) -> Self {
        Self {
            locks: &LockTable,
            capability: &PrivilegeCapability,
            session,
            privileges,
            locked,
        }
    }

    /// Replaces the lock and capability collaborators.
    pub fn with_services(mut self, locks: &'a dyn LockService, capability: &'a dyn Capability) -> Self {
        self.locks = locks;
        self.capability = capability;
        self
    }

    /// Returns true if the item must be presented read-only.
    ///
    /// Only existing items can be read-only; ids starting with
    /// `temp_id_prefix` belong to items not created yet. Existing items are
    /// read-only when the user can't edit, no lock is held, the lock is
    /// restricted, or the lock was taken for something other than editing.
    pub fn is_read_only(&self, item_type: ItemType, item: Option<&Item>, temp_id_prefix: &str) -> bool {
        let Some(item) = item else {
            return false;
        };
        if !is_existing_item(item.fields(), temp_id_prefix) {
            return false;
        }

        let can_edit = self
            .capability
            .can_edit(item_type, item, self.session, self.privileges, self.locked);
        let lock = self.locks.get_lock(item, self.locked);
        let restricted = self.locks.is_lock_restricted(item, self.session, self.locked);

        !can_edit
            || restricted
            || match lock {
                Some(lock) => lock.action != EDIT_ACTION,
                None => true,
            }
    }
}

impl std::fmt::Debug for LockGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("session", &self.session)
            .field("privileges", &self.privileges)
            .field("locked", &self.locked)
            .finish()
    }
}
