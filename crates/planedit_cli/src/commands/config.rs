//! Configuration commands.

use anyhow::{Context, Result};
use console::style;
use planedit_core::{Config, CONFIG_FILE};
use std::path::Path;

/// Print the effective configuration.
pub fn show(root: &Path) -> Result<()> {
    let config = Config::load(root).context("failed to load configuration")?;
    let path = root.join(CONFIG_FILE);

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    println!();
    println!("[autosave]");
    println!("enabled = {}", config.autosave.enabled);
    println!("interval_ms = {}", config.autosave.interval_ms);
    println!();
    println!("[storage]");
    println!("autosave_db = {:?}", config.storage.autosave_db);
    println!();
    println!("[session]");
    println!("temp_id_prefix = {:?}", config.session.temp_id_prefix);
    println!("teardown_on_cancel = {}", config.session.teardown_on_cancel);

    Ok(())
}

/// Write the default configuration file.
pub fn init(root: &Path, force: bool) -> Result<()> {
    let path = root.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        ));
    }

    std::fs::create_dir_all(root)
        .with_context(|| format!("failed to create {}", root.display()))?;
    Config::default()
        .save(root)
        .context("failed to write configuration")?;

    println!("{} Wrote {}", style("✓").green(), path.display());
    Ok(())
}
