//! Subcommands and the option set they share.

pub mod diff;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};

use codex_core::config::{
    parse_extensions_strict, SyncOptions, DEFAULT_API_BASE_URL, DEFAULT_FILE_EXTENSIONS,
    DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};
use codex_sync::{GitClock, HistoryClock, NoHistory};

/// Options common to `sync` and `diff`.
///
/// Env names follow the `INPUT_<NAME>` convention CI action runners use.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bearer credential for the content API.
    #[arg(long, env = "INPUT_SPARK_API_KEY", hide_env_values = true)]
    pub spark_api_key: String,

    /// Codex to reconcile against.
    #[arg(long, env = "INPUT_CODEX_ID")]
    pub codex_id: String,

    /// Local directory to sync.
    #[arg(long, env = "INPUT_DIRECTORY")]
    pub directory: PathBuf,

    /// Base URL of the content API.
    #[arg(long, env = "INPUT_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Comma-separated list of file extensions to include (case-sensitive).
    #[arg(long, env = "INPUT_FILE_EXTENSIONS", default_value = DEFAULT_FILE_EXTENSIONS)]
    pub file_extensions: String,

    /// Show what would change without modifying the remote store.
    #[arg(
        long,
        env = "INPUT_DRY_RUN",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
    )]
    pub dry_run: bool,

    /// Delete remote files that no longer exist locally.
    #[arg(
        long,
        env = "INPUT_DELETE_REMOVED",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub delete_removed: bool,

    /// Items requested per listing page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Retries for transient upload/delete failures.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Use filesystem mtimes only; skip git history lookups.
    #[arg(long)]
    pub no_history: bool,

    /// Emit machine-readable JSON instead of the human report.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn to_options(&self) -> Result<SyncOptions> {
        let mut opts = SyncOptions::new(
            self.spark_api_key.clone(),
            self.codex_id.clone(),
            self.directory.clone(),
        );
        opts.api_base_url = self.api_base_url.clone();
        opts.extensions = parse_extensions_strict(&self.file_extensions)?;
        opts.dry_run = self.dry_run;
        opts.delete_removed = self.delete_removed;
        opts.page_size = self.page_size;
        opts.timeout_secs = self.timeout;
        opts.max_retries = self.retries;
        opts.validate().context("invalid configuration")
    }

    pub fn clock(&self) -> &'static dyn HistoryClock {
        if self.no_history {
            &NoHistory
        } else {
            &GitClock
        }
    }
}
