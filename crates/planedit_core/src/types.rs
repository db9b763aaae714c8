//! Core data types for editing sessions.

use crate::error::{EditError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Field map of an item or working copy.
pub type Fields = Map<String, Value>;

/// Field path → messages. Empty means nothing blocks a commit.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Prefix of system-owned bookkeeping fields.
pub const INTERNAL_PREFIX: &str = "_";
/// Prefix of lock-owned fields.
pub const LOCK_PREFIX: &str = "lock_";
/// Primary key field.
pub const ID_FIELD: &str = "_id";
/// Internal field that autosave keeps despite its prefix.
pub const PLANNING_ITEM_FIELD: &str = "_planning_item";
/// Field carrying the item type.
pub const TYPE_FIELD: &str = "type";

/// Workflow state values forced by commit payloads.
pub mod workflow {
    pub const SCHEDULED: &str = "scheduled";
    pub const KILLED: &str = "killed";
    pub const SPIKED: &str = "spiked";
}

/// Publication state values forced by commit payloads.
pub mod pubstatus {
    pub const USABLE: &str = "usable";
    pub const CANCELLED: &str = "cancelled";
}

/// Returns true for fields the dirty comparison and rehydration ignore.
pub fn is_bookkeeping_field(key: &str) -> bool {
    key.starts_with(INTERNAL_PREFIX) || key.starts_with(LOCK_PREFIX)
}

/// Kind of content item under edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A calendar event.
    Event,
    /// A planning record with coverages.
    Planning,
}

impl ItemType {
    /// Returns the wire name of the item type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Planning => "planning",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "event" => Ok(Self::Event),
            "planning" => Ok(Self::Planning),
            other => Err(EditError::Deserialization(format!(
                "unknown item type: {}",
                other
            ))),
        }
    }
}

/// Immutable snapshot of an item as last confirmed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    fields: Fields,
}

impl Item {
    /// Wraps a field map.
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    /// Builds an item from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(EditError::Deserialization(format!(
                "item must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Returns the item's fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Consumes the item, returning its fields.
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the primary key, if any.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Returns the item type recorded on the item.
    pub fn item_type(&self) -> Option<ItemType> {
        self.fields
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Returns the workflow state.
    pub fn state(&self) -> Option<&str> {
        self.fields.get("state").and_then(Value::as_str)
    }

    /// Returns true if the item has been killed.
    pub fn is_killed(&self) -> bool {
        self.state() == Some(workflow::KILLED)
    }
}

/// Returns true when `fields` describes an item already known to the server.
pub fn is_existing_item(fields: &Fields, temp_id_prefix: &str) -> bool {
    match fields.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) => !id.is_empty() && !id.starts_with(temp_id_prefix),
        None => false,
    }
}

/// Filtered projection of a working copy, stored for crash recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveRecord {
    /// Type of the item.
    pub item_type: ItemType,
    /// Identifier of the item (temporary for new items).
    pub item_id: String,
    /// Storage-shaped fields.
    pub fields: Fields,
}

impl AutosaveRecord {
    /// Returns the storage key for this record.
    pub fn key(&self) -> String {
        Self::storage_key(self.item_type, &self.item_id)
    }

    /// Returns the storage key for an `(item_type, item_id)` pair.
    pub fn storage_key(item_type: ItemType, item_id: &str) -> String {
        format!("{}:{}", item_type, item_id)
    }
}

/// Editing session state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No item open.
    Idle,
    /// Waiting for the item loader.
    Loading,
    /// Working copy open and accepting edits and commits.
    Ready,
    /// A commit is in flight.
    Submitting,
    /// A partial save is in flight; external updates are deferred.
    PartialSaving,
    /// Torn down. A new open re-enters `Loading`.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How an event save applies to recurring series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMethod {
    /// Only this occurrence.
    #[default]
    Single,
    /// This and future occurrences.
    Future,
    /// Every occurrence.
    All,
}

impl UpdateMethod {
    /// Returns the wire name of the update method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Future => "future",
            Self::All => "all",
        }
    }
}

/// Committing operations gated by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// Plain save.
    Save,
    /// Save with the payload forced to scheduled/usable.
    SaveAndPost,
    /// Save with the payload forced to killed/cancelled.
    SaveUnpost,
    /// Post the working copy.
    Post,
    /// Unpost the working copy.
    Unpost,
}

impl CommitKind {
    /// Returns true for operations that go through the save call.
    pub fn is_save(&self) -> bool {
        matches!(self, Self::Save | Self::SaveAndPost | Self::SaveUnpost)
    }

    /// Returns the operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::SaveAndPost => "save and post",
            Self::SaveUnpost => "save and unpost",
            Self::Post => "post",
            Self::Unpost => "unpost",
        }
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
