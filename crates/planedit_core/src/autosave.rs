//! Throttled autosave of working copies and rehydration on resume.

use crate::config::AutosaveConfig;
use crate::error::{EditError, Result};
use crate::schema::ItemSchema;
use crate::throttle::Throttle;
use crate::types::{
    is_bookkeeping_field, AutosaveRecord, Fields, ItemType, ID_FIELD, INTERNAL_PREFIX,
    LOCK_PREFIX, PLANNING_ITEM_FIELD,
};
use crate::TimeProvider;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Storage collaborator for autosave records.
///
/// Records are keyed by `(item_type, item_id)`; a save overwrites.
pub trait AutosaveStore: Send + Sync {
    /// Writes a record, replacing any previous one for the same item.
    fn save(&self, record: &AutosaveRecord) -> Result<()>;

    /// Reads the record for an item.
    fn load(&self, item_type: ItemType, item_id: &str) -> Result<Option<AutosaveRecord>>;

    /// Deletes the record for an item. Returns true if one existed.
    fn delete(&self, item_type: ItemType, item_id: &str) -> Result<bool>;

    /// Lists every stored record.
    fn list(&self) -> Result<Vec<AutosaveRecord>>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryAutosaveStore {
    records: Mutex<BTreeMap<String, AutosaveRecord>>,
    writes: Mutex<u64>,
}

impl MemoryAutosaveStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, AutosaveRecord>>> {
        self.records
            .lock()
            .map_err(|_| EditError::Storage("memory store lock poisoned".into()))
    }
}

impl AutosaveStore for MemoryAutosaveStore {
    fn save(&self, record: &AutosaveRecord) -> Result<()> {
        self.records()?.insert(record.key(), record.clone());
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }

    fn load(&self, item_type: ItemType, item_id: &str) -> Result<Option<AutosaveRecord>> {
        let key = AutosaveRecord::storage_key(item_type, item_id);
        Ok(self.records()?.get(&key).cloned())
    }

    fn delete(&self, item_type: ItemType, item_id: &str) -> Result<bool> {
        let key = AutosaveRecord::storage_key(item_type, item_id);
        Ok(self.records()?.remove(&key).is_some())
    }

    fn list(&self) -> Result<Vec<AutosaveRecord>> {
        Ok(self.records()?.values().cloned().collect())
    }
}

/// Projects a working copy into its stored record.
///
/// Internal and lock fields are dropped, except `_id` and `_planning_item`
/// which are kept when present. The item type's schema then reshapes the
/// remaining fields.
pub fn project_record(item_type: ItemType, item_id: &str, diff: &Fields) -> AutosaveRecord {
    let mut fields: Fields = diff
        .iter()
        .filter(|(key, _)| {
            key.as_str() == ID_FIELD
                || key.as_str() == PLANNING_ITEM_FIELD
                || !(key.starts_with(INTERNAL_PREFIX) || key.starts_with(LOCK_PREFIX))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    ItemSchema::for_type(item_type).project(&mut fields);

    AutosaveRecord {
        item_type,
        item_id: item_id.to_string(),
        fields,
    }
}

/// Throttled, best-effort snapshotting of one session's working copy.
///
/// Writes happen synchronously inside [`poll`](Self::poll) or
/// [`flush`](Self::flush), so at most one write is ever in flight and a
/// burst of edits produces a single write carrying the latest copy.
pub struct AutosavePersistor {
    store: Arc<dyn AutosaveStore>,
    throttle: Throttle<AutosaveRecord>,
    enabled: bool,
}

impl AutosavePersistor {
    /// Creates a persistor with the given trailing interval.
    pub fn new(store: Arc<dyn AutosaveStore>, interval: Duration, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            store,
            throttle: Throttle::new(interval, clock),
            enabled: true,
        }
    }

    /// Creates a persistor from configuration.
    pub fn from_config(
        config: &AutosaveConfig,
        store: Arc<dyn AutosaveStore>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let mut persistor = Self::new(store, config.interval(), clock);
        persistor.enabled = config.enabled;
        persistor
    }

    /// Queues a snapshot of `diff`, replacing any queued one.
    pub fn schedule(&mut self, item_type: ItemType, item_id: &str, diff: &Fields) {
        if !self.enabled {
            return;
        }
        let record = project_record(item_type, item_id, diff);
        debug!(key = %record.key(), "autosave scheduled");
        self.throttle.call(record);
    }

    /// Writes the queued snapshot if its interval has elapsed.
    ///
    /// Returns true if a write was attempted.
    pub fn poll(&mut self) -> bool {
        match self.throttle.poll() {
            Some(record) => {
                self.write(&record);
                true
            }
            None => false,
        }
    }

    /// Writes the queued snapshot now, if any.
    pub fn flush(&mut self) -> bool {
        match self.throttle.flush() {
            Some(record) => {
                self.write(&record);
                true
            }
            None => false,
        }
    }

    /// Drops the queued snapshot without writing it.
    pub fn discard(&mut self) {
        self.throttle.cancel();
    }

    /// Returns true if a snapshot is queued.
    pub fn has_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    /// Returns the stored snapshot for an item in working-copy shape.
    ///
    /// Bookkeeping fields are removed. Storage failures are logged and
    /// reported as no snapshot.
    pub fn load(&self, item_type: ItemType, item_id: &str) -> Option<Fields> {
        let record = match self.store.load(item_type, item_id) {
            Ok(record) => record?,
            Err(e) => {
                warn!(item_type = %item_type, item_id, error = %e, "autosave load failed");
                return None;
            }
        };

        let mut fields = record.fields;
        ItemSchema::for_type(item_type).denormalize(&mut fields);
        fields.retain(|key, _| !is_bookkeeping_field(key));
        Some(fields)
    }

    /// Returns the backing store.
    pub fn store(&self) -> &Arc<dyn AutosaveStore> {
        &self.store
    }

    fn write(&self, record: &AutosaveRecord) {
        match self.store.save(record) {
            Ok(()) => debug!(key = %record.key(), "autosave written"),
            Err(e) => warn!(key = %record.key(), error = %e, "autosave persist failed"),
        }
    }
}

impl std::fmt::Debug for AutosavePersistor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosavePersistor")
            .field("throttle", &self.throttle)
            .field("enabled", &self.enabled)
            .finish()
    }
}
