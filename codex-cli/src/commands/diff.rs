//! `codex-sync diff` — show the reconciliation plan without applying it.

use std::io;

use anyhow::{Context, Result};
use clap::Args;

use codex_sync::{pipeline, HttpContentStore};

use super::RunArgs;
use crate::report;

/// Arguments for `codex-sync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let opts = self.run.to_options()?;
        let store = HttpContentStore::from_options(&opts);

        let plan = pipeline::plan(&opts, &store, self.run.clock()).context("diff failed")?;

        let mut stdout = io::stdout().lock();
        if self.run.json {
            report::render_plan_json(&mut stdout, &plan)?;
        } else {
            report::render_preview(&mut stdout, &plan, opts.delete_removed, true)?;
        }
        Ok(())
    }
}
