use anyhow::{Context, Result};
use planedit_core::{
    pubstatus, workflow, EditError, Fields, Item, ItemLoader, ItemType, Persistence, ID_FIELD,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// In-process stand-in for the planning server.
///
/// Stores items by id, stamps a fresh `_etag` on every write and hands out
/// server ids for items saved under a temporary one.
#[derive(Debug, Default)]
pub struct FakeServer {
    items: BTreeMap<String, Item>,
    temp_id_prefix: String,
    fail_next: Option<String>,
    writes: Vec<String>,
    next_id: u64,
    next_etag: u64,
}

impl FakeServer {
    /// Create a server with no items
    pub fn new(temp_id_prefix: &str) -> Self {
        Self {
            temp_id_prefix: temp_id_prefix.to_string(),
            ..Self::default()
        }
    }

    /// Load items from a JSON array file
    pub fn from_file(path: &Path, temp_id_prefix: &str) -> Result<Self> {
        let mut server = Self::new(temp_id_prefix);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let values: Vec<Value> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        for value in values {
            let item = Item::from_value(value)?;
            let id = item
                .id()
                .ok_or_else(|| anyhow::anyhow!("fixture item without _id"))?
                .to_string();
            server.items.insert(id, item);
        }
        Ok(server)
    }

    /// Get a stored item
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Number of accepted writes
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Operations of accepted writes, oldest first
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Reject the next write with `reason`
    pub fn fail_next(&mut self, reason: &str) {
        self.fail_next = Some(reason.to_string());
    }

    /// Change a field as another user would, returning the new version
    pub fn update_field(&mut self, id: &str, field: &str, value: Value) -> Result<Item> {
        let mut fields = self
            .items
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("no item {}", id))?
            .fields()
            .clone();
        fields.insert(field.to_string(), value);
        Ok(self.store(fields))
    }

    /// Bump only the etag of an item, returning the new version
    pub fn touch(&mut self, id: &str) -> Result<Item> {
        let fields = self
            .items
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("no item {}", id))?
            .fields()
            .clone();
        Ok(self.store(fields))
    }

    fn store(&mut self, mut fields: Fields) -> Item {
        self.next_etag += 1;
        fields.insert("_etag".to_string(), Value::from(format!("srv-{}", self.next_etag)));
        let item = Item::new(fields);
        if let Some(id) = item.id() {
            self.items.insert(id.to_string(), item.clone());
        }
        item
    }

    fn take_failure(&mut self, operation: &str) -> planedit_core::Result<()> {
        match self.fail_next.take() {
            Some(reason) => Err(EditError::remote(operation, reason)),
            None => Ok(()),
        }
    }

    fn set_status(&mut self, operation: &str, diff: &Fields, state: &str, status: &str) -> planedit_core::Result<Item> {
        self.take_failure(operation)?;
        let id = diff
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| EditError::remote(operation, "missing _id"))?;
        let mut fields = self
            .items
            .get(id)
            .ok_or_else(|| EditError::remote(operation, format!("no item {}", id)))?
            .fields()
            .clone();
        fields.insert("state".to_string(), Value::from(state));
        fields.insert("pubstatus".to_string(), Value::from(status));
        self.writes.push(operation.to_string());
        Ok(self.store(fields))
    }
}

impl ItemLoader for FakeServer {
    fn load(&mut self, item_id: &str, item_type: ItemType) -> planedit_core::Result<Item> {
        match self.items.get(item_id) {
            Some(item) if item.item_type() == Some(item_type) => Ok(item.clone()),
            Some(_) => Err(EditError::remote("load", format!("{} is not a {}", item_id, item_type))),
            None => Err(EditError::remote("load", format!("no item {}", item_id))),
        }
    }
}

impl Persistence for FakeServer {
    fn save(&mut self, payload: &Fields, _with_confirmation: bool) -> planedit_core::Result<Item> {
        self.take_failure("save")?;

        let mut fields = payload.clone();
        fields.remove("update_method");
        let is_temp = match fields.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) => id.starts_with(&self.temp_id_prefix),
            None => true,
        };
        if is_temp {
            self.next_id += 1;
            fields.insert(ID_FIELD.to_string(), Value::from(format!("new-{}", self.next_id)));
        }

        self.writes.push("save".to_string());
        Ok(self.store(fields))
    }

    fn post(&mut self, diff: &Fields) -> planedit_core::Result<Item> {
        self.set_status("post", diff, workflow::SCHEDULED, pubstatus::USABLE)
    }

    fn unpost(&mut self, diff: &Fields) -> planedit_core::Result<Item> {
        self.set_status("unpost", diff, workflow::KILLED, pubstatus::CANCELLED)
    }
}
