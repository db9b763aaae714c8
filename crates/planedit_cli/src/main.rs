//! Planedit CLI - inspect and manage editing-session autosaves.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "planedit")]
#[command(about = "Editing session autosave inspection", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding planedit.toml and the autosave store
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and manage autosaved working copies
    Autosave {
        #[command(subcommand)]
        command: AutosaveCommands,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AutosaveCommands {
    /// List stored autosave records
    List,
    /// Print one record in working-copy shape
    Show {
        /// Item type (event, planning)
        item_type: String,
        /// Item ID
        item_id: String,
        /// Print the stored shape instead
        #[arg(long)]
        raw: bool,
    },
    /// Delete one record
    Drop {
        /// Item type (event, planning)
        item_type: String,
        /// Item ID
        item_id: String,
    },
    /// Delete every record
    Clear {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root.as_path();

    match cli.command {
        Commands::Autosave { command } => match command {
            AutosaveCommands::List => commands::autosave::list(root),
            AutosaveCommands::Show {
                item_type,
                item_id,
                raw,
            } => commands::autosave::show(root, &item_type, &item_id, raw),
            AutosaveCommands::Drop { item_type, item_id } => {
                commands::autosave::drop(root, &item_type, &item_id)
            }
            AutosaveCommands::Clear { yes } => commands::autosave::clear(root, yes),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(root),
            ConfigCommands::Init { force } => commands::config::init(root, force),
        },
    }
}
