//! Shared pipeline entrypoint used by the CLI subcommands.
//!
//! `plan` covers everything up to the diff and never mutates the remote
//! store; `apply` hands the plan to the executor.

use codex_core::SyncOptions;

use crate::diff::{self, DiffPartition};
use crate::error::SyncError;
use crate::executor::{self, ExecuteOptions, ExecutionOutcome};
use crate::remote::{self, RemoteInventory};
use crate::scanner::{self, LocalInventory};
use crate::store::{ContentStore, RetryPolicy};
use crate::vcs::HistoryClock;

/// Both inventories and their partition.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub local: LocalInventory,
    pub remote: RemoteInventory,
    pub partition: DiffPartition,
}

/// Scan, fetch and diff.
///
/// The local root is checked before any network call.
pub fn plan(
    opts: &SyncOptions,
    store: &dyn ContentStore,
    clock: &dyn HistoryClock,
) -> Result<SyncPlan, SyncError> {
    let local = scanner::scan(&opts.directory, &opts.extensions, clock)?;
    let remote = remote::fetch_inventory(store, &opts.codex_id, opts.page_size)?;
    let partition = diff::compute(&remote, &local);

    let counts = partition.counts();
    tracing::info!(
        add = counts.to_add,
        update = counts.to_update,
        delete = counts.to_delete,
        unchanged = counts.unchanged,
        "diff computed"
    );

    Ok(SyncPlan {
        local,
        remote,
        partition,
    })
}

/// Execute a plan with the run's options.
pub fn apply(plan: &SyncPlan, opts: &SyncOptions, store: &dyn ContentStore) -> ExecutionOutcome {
    executor::execute(
        &plan.partition,
        store,
        &opts.codex_id,
        ExecuteOptions {
            dry_run: opts.dry_run,
            delete_removed: opts.delete_removed,
            retry: RetryPolicy::new(opts.max_retries),
        },
    )
}

/// `plan` followed by `apply`.
pub fn run(
    opts: &SyncOptions,
    store: &dyn ContentStore,
    clock: &dyn HistoryClock,
) -> Result<(SyncPlan, ExecutionOutcome), SyncError> {
    let plan = plan(opts, store, clock)?;
    let outcome = apply(&plan, opts, store);
    Ok((plan, outcome))
}
