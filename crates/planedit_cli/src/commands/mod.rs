//! CLI commands.

pub mod autosave;
pub mod config;

use anyhow::{Context, Result};
use planedit_core::{Config, RedbAutosaveStore};
use std::path::Path;
use tracing::debug;

/// Loads configuration and opens the autosave store under `root`.
pub(crate) fn open_store(root: &Path) -> Result<(Config, RedbAutosaveStore)> {
    let config = Config::load(root).context("failed to load configuration")?;
    let path = config.autosave_db_path(root);
    debug!(path = %path.display(), "opening autosave store");
    let store = RedbAutosaveStore::open(&path).map_err(|e| {
        let hint = e
            .recovery_suggestion()
            .map(|s| format!("\n  hint: {}", s))
            .unwrap_or_default();
        anyhow::anyhow!("failed to open {}: {}{}", path.display(), e, hint)
    })?;
    Ok((config, store))
}
