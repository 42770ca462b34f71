//! codex-sync — reconcile a local directory with a remote Codex.
//!
//! # Usage
//!
//! ```text
//! codex-sync sync --spark-api-key <KEY> --codex-id <ID> --directory <DIR> [--dry-run] [--delete-removed false]
//! codex-sync diff --spark-api-key <KEY> --codex-id <ID> --directory <DIR> [--json]
//! ```
//!
//! Every option can also be given through the matching `INPUT_*` variable.

mod commands;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "codex-sync",
    version,
    about = "Sync a local directory to a remote Codex content store",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload new and changed files and delete remote files missing locally.
    Sync(SyncArgs),

    /// Show what sync would change without touching the remote store.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
