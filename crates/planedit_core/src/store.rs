//! Durable autosave storage backed by redb.
//!
//! Records are stored as JSON under `"<item_type>:<item_id>"` keys. The
//! database carries a schema version in its metadata table and refuses to
//! open a file written by an incompatible build.

use crate::autosave::AutosaveStore;
use crate::error::{storage_err, EditError, Result};
use crate::types::{AutosaveRecord, ItemType};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Autosave schema version for migration support.
pub const AUTOSAVE_SCHEMA_VERSION: u32 = 1;

const METADATA_TABLE: TableDefinition<&str, u32> = TableDefinition::new("metadata");
const RECORDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("autosave_records");

/// Autosave store in a single redb file.
pub struct RedbAutosaveStore {
    db: Database,
    path: PathBuf,
}

impl RedbAutosaveStore {
    /// Opens the database at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SchemaMismatch`] if the file was written with a
    /// different schema version, or a storage error if it can't be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path).map_err(storage_err("failed to open autosave db"))?;

        let write_txn = db
            .begin_write()
            .map_err(storage_err("failed to begin write transaction"))?;
        {
            let mut meta = write_txn
                .open_table(METADATA_TABLE)
                .map_err(storage_err("failed to open metadata table"))?;

            let found = meta
                .get("version")
                .map_err(storage_err("failed to read schema version"))?
                .map(|v| v.value());

            match found {
                Some(version) if version != AUTOSAVE_SCHEMA_VERSION => {
                    return Err(EditError::SchemaMismatch {
                        found: version,
                        expected: AUTOSAVE_SCHEMA_VERSION,
                    });
                }
                Some(_) => {}
                None => {
                    meta.insert("version", AUTOSAVE_SCHEMA_VERSION)
                        .map_err(storage_err("failed to write schema version"))?;
                }
            }

            write_txn
                .open_table(RECORDS_TABLE)
                .map_err(storage_err("failed to open records table"))?;
        }
        write_txn
            .commit()
            .map_err(storage_err("failed to commit"))?;

        debug!(path = %path.display(), "autosave store opened");
        Ok(Self { db, path })
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes every record. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let keys = {
            let read_txn = self
                .db
                .begin_read()
                .map_err(storage_err("failed to begin read transaction"))?;
            let table = read_txn
                .open_table(RECORDS_TABLE)
                .map_err(storage_err("failed to open records table"))?;
            let mut keys = Vec::new();
            for entry in table
                .iter()
                .map_err(storage_err("failed to iterate records"))?
            {
                let (key, _) = entry.map_err(storage_err("failed to read record"))?;
                keys.push(key.value().to_string());
            }
            keys
        };

        let write_txn = self
            .db
            .begin_write()
            .map_err(storage_err("failed to begin write transaction"))?;
        {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(storage_err("failed to open records table"))?;
            for key in &keys {
                table
                    .remove(key.as_str())
                    .map_err(storage_err("failed to remove record"))?;
            }
        }
        write_txn
            .commit()
            .map_err(storage_err("failed to commit"))?;

        Ok(keys.len())
    }
}

impl AutosaveStore for RedbAutosaveStore {
    fn save(&self, record: &AutosaveRecord) -> Result<()> {
        let bytes =
            serde_json::to_vec(record).map_err(|e| EditError::Serialization(e.to_string()))?;
        let key = record.key();

        let write_txn = self
            .db
            .begin_write()
            .map_err(storage_err("failed to begin write transaction"))?;
        {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(storage_err("failed to open records table"))?;
            table
                .insert(key.as_str(), bytes.as_slice())
                .map_err(storage_err("failed to insert record"))?;
        }
        write_txn
            .commit()
            .map_err(storage_err("failed to commit"))?;
        Ok(())
    }

    fn load(&self, item_type: ItemType, item_id: &str) -> Result<Option<AutosaveRecord>> {
        let key = AutosaveRecord::storage_key(item_type, item_id);
        let read_txn = self
            .db
            .begin_read()
            .map_err(storage_err("failed to begin read transaction"))?;
        let table = read_txn
            .open_table(RECORDS_TABLE)
            .map_err(storage_err("failed to open records table"))?;

        let Some(bytes) = table
            .get(key.as_str())
            .map_err(storage_err("failed to get record"))?
        else {
            return Ok(None);
        };
        serde_json::from_slice(bytes.value())
            .map(Some)
            .map_err(|e| EditError::Deserialization(format!("record {}: {}", key, e)))
    }

    fn delete(&self, item_type: ItemType, item_id: &str) -> Result<bool> {
        let key = AutosaveRecord::storage_key(item_type, item_id);
        let write_txn = self
            .db
            .begin_write()
            .map_err(storage_err("failed to begin write transaction"))?;
        let existed = {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(storage_err("failed to open records table"))?;
            let removed = table
                .remove(key.as_str())
                .map_err(storage_err("failed to remove record"))?;
            removed.is_some()
        };
        write_txn
            .commit()
            .map_err(storage_err("failed to commit"))?;
        Ok(existed)
    }

    fn list(&self) -> Result<Vec<AutosaveRecord>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(storage_err("failed to begin read transaction"))?;
        let table = read_txn
            .open_table(RECORDS_TABLE)
            .map_err(storage_err("failed to open records table"))?;

        let mut records = Vec::new();
        for entry in table
            .iter()
            .map_err(storage_err("failed to iterate records"))?
        {
            let (key, value) = entry.map_err(storage_err("failed to read record"))?;
            match serde_json::from_slice::<AutosaveRecord>(value.value()) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = key.value(), error = %e, "skipping unreadable autosave record"),
            }
        }
        Ok(records)
    }
}

impl std::fmt::Debug for RedbAutosaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbAutosaveStore")
            .field("path", &self.path)
            .finish()
    }
}
