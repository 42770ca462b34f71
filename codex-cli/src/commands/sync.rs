//! `codex-sync sync` — push local additions, changes and removals.

use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use codex_sync::{pipeline, HttpContentStore};

use super::RunArgs;
use crate::report;

/// Arguments for `codex-sync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let opts = self.run.to_options()?;
        let store = HttpContentStore::from_options(&opts);

        let plan = pipeline::plan(&opts, &store, self.run.clock()).context("sync failed")?;

        let mut stdout = io::stdout().lock();
        if !self.run.json {
            report::render_preview(&mut stdout, &plan, opts.delete_removed, opts.dry_run)?;
        }

        let outcome = pipeline::apply(&plan, &opts, &store);

        if self.run.json {
            report::render_outcome_json(&mut stdout, &outcome)?;
        } else {
            report::render_summary(&mut stdout, &outcome, opts.delete_removed)?;
        }

        if let Some(output) = std::env::var_os("GITHUB_OUTPUT") {
            let path = Path::new(&output);
            report::write_step_outputs(path, &outcome.counts)
                .with_context(|| format!("failed to write step outputs to {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote step outputs");
        }

        if !outcome.is_success() {
            bail!("{} remote operation(s) failed", outcome.errors());
        }
        Ok(())
    }
}
