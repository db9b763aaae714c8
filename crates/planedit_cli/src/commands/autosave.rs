//! Autosave inspection commands.

use super::open_store;
use anyhow::{Context, Result};
use console::style;
use planedit_core::{AutosavePersistor, AutosaveStore, ItemType, SystemClock};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// List stored autosave records.
pub fn list(root: &Path) -> Result<()> {
    let (_config, store) = open_store(root)?;
    let mut records = store.list()?;
    records.sort_by(|a, b| a.key().cmp(&b.key()));

    if records.is_empty() {
        println!("No autosaved working copies in {}", store.path().display());
        return Ok(());
    }

    println!(
        "{} autosaved working cop{}:",
        style(records.len()).bold(),
        if records.len() == 1 { "y" } else { "ies" }
    );
    for record in &records {
        let label = record
            .fields
            .get("slugline")
            .or_else(|| record.fields.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        println!(
            "  {:<9} {}  {} field(s)  {}",
            style(record.item_type).cyan(),
            record.item_id,
            record.fields.len(),
            style(label).dim()
        );
    }

    Ok(())
}

/// Print one record, in working-copy shape unless `raw`.
pub fn show(root: &Path, item_type: &str, item_id: &str, raw: bool) -> Result<()> {
    let item_type: ItemType = item_type.parse()?;
    let (config, store) = open_store(root)?;

    let fields = if raw {
        store.load(item_type, item_id)?.map(|record| record.fields)
    } else {
        let persistor =
            AutosavePersistor::from_config(&config.autosave, Arc::new(store), Arc::new(SystemClock));
        persistor.load(item_type, item_id)
    };

    match fields {
        Some(fields) => {
            let json = serde_json::to_string_pretty(&fields)
                .context("failed to format record")?;
            println!("{}", json);
            Ok(())
        }
        None => Err(anyhow::anyhow!(
            "No autosave for {} {}",
            item_type,
            item_id
        )),
    }
}

/// Delete one record.
pub fn drop(root: &Path, item_type: &str, item_id: &str) -> Result<()> {
    let item_type: ItemType = item_type.parse()?;
    let (_config, store) = open_store(root)?;

    if store.delete(item_type, item_id)? {
        println!("{} Dropped autosave for {} {}", style("✓").green(), item_type, item_id);
    } else {
        println!("No autosave for {} {}", item_type, item_id);
    }
    Ok(())
}

/// Delete every record.
pub fn clear(root: &Path, yes: bool) -> Result<()> {
    let (_config, store) = open_store(root)?;

    if !yes {
        println!(
            "{} This deletes every autosaved working copy in {}.",
            style("⚠").yellow().bold(),
            store.path().display()
        );
        print!("Continue? [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{} Nothing deleted.", style("✓").green());
            return Ok(());
        }
    }

    let removed = store.clear()?;
    println!("{} Removed {} record(s)", style("✓").green(), removed);
    Ok(())
}
