//! Sync executor: applies a [`DiffPartition`] to the remote store.
//!
//! Phases run in a fixed order: deletions (when enabled), updates, additions.
//! Every entry is attempted; a failed call is recorded and the next entry
//! proceeds. An update is delete-then-create, and only a failed create counts
//! against it.

use std::fmt;
use std::path::Path;

use codex_core::{ContentId, DiffEntry, SyncCounts};

use crate::diff::DiffPartition;
use crate::error::RemoteError;
use crate::store::{with_retries, ContentStore, RetryPolicy};

/// How to apply a partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub dry_run: bool,
    pub delete_removed: bool,
    pub retry: RetryPolicy,
}

/// The remote mutation an entry required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete,
    Update,
    Add,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Delete => write!(f, "delete"),
            Action::Update => write!(f, "update"),
            Action::Add => write!(f, "add"),
        }
    }
}

/// One entry whose remote call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub identifier: String,
    pub action: Action,
    pub message: String,
}

/// Aggregate result of [`execute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub counts: SyncCounts,
    pub failures: Vec<ItemFailure>,
    /// Deletions left in place because deletion was disabled.
    pub skipped_deletes: usize,
    pub dry_run: bool,
}

impl ExecutionOutcome {
    pub fn errors(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Apply (or, in dry-run, skip) every entry in `partition`.
pub fn execute(
    partition: &DiffPartition,
    store: &dyn ContentStore,
    codex_id: &str,
    opts: ExecuteOptions,
) -> ExecutionOutcome {
    if opts.dry_run {
        tracing::info!("dry run; no remote changes made");
        return ExecutionOutcome {
            dry_run: true,
            ..ExecutionOutcome::default()
        };
    }

    let mut outcome = ExecutionOutcome::default();

    // Phase 1: deletions.
    for entry in partition.to_delete() {
        let DiffEntry::ToDelete {
            identifier,
            remote_id,
        } = entry
        else {
            continue;
        };
        if !opts.delete_removed {
            outcome.skipped_deletes += 1;
            continue;
        }
        match delete(store, remote_id, opts.retry) {
            Ok(()) => {
                tracing::info!(identifier = %identifier, content_id = %remote_id, "deleted");
                outcome.counts.files_deleted += 1;
            }
            Err(err) => record_failure(&mut outcome, identifier, Action::Delete, &err),
        }
    }
    if outcome.skipped_deletes > 0 {
        tracing::info!(
            count = outcome.skipped_deletes,
            "deletion disabled; remote-only files left in place"
        );
    }

    // Phase 2: updates.
    for entry in partition.to_update() {
        let DiffEntry::ToUpdate {
            identifier,
            path,
            remote_id,
            ..
        } = entry
        else {
            continue;
        };
        if let Err(err) = delete(store, remote_id, opts.retry) {
            tracing::warn!(
                identifier = %identifier,
                content_id = %remote_id,
                error = %err,
                "could not remove previous version; uploading anyway"
            );
        }
        match upload(store, codex_id, path, opts.retry) {
            Ok(()) => {
                tracing::info!(identifier = %identifier, "updated");
                outcome.counts.files_updated += 1;
            }
            Err(err) => record_failure(&mut outcome, identifier, Action::Update, &err),
        }
    }

    // Phase 3: additions.
    for entry in partition.to_add() {
        let DiffEntry::ToAdd {
            identifier, path, ..
        } = entry
        else {
            continue;
        };
        match upload(store, codex_id, path, opts.retry) {
            Ok(()) => {
                tracing::info!(identifier = %identifier, "added");
                outcome.counts.files_added += 1;
            }
            Err(err) => record_failure(&mut outcome, identifier, Action::Add, &err),
        }
    }

    outcome.counts.files_unchanged = partition.counts().unchanged;

    if !outcome.is_success() {
        tracing::error!(errors = outcome.errors(), "sync finished with failures");
    }
    outcome
}

fn delete(
    store: &dyn ContentStore,
    remote_id: &ContentId,
    retry: RetryPolicy,
) -> Result<(), RemoteError> {
    with_retries(retry, || store.delete(remote_id))
}

fn upload(
    store: &dyn ContentStore,
    codex_id: &str,
    path: &Path,
    retry: RetryPolicy,
) -> Result<(), RemoteError> {
    with_retries(retry, || store.upload(codex_id, path))
}

fn record_failure(
    outcome: &mut ExecutionOutcome,
    identifier: &str,
    action: Action,
    err: &RemoteError,
) {
    tracing::error!(identifier, %action, error = %err, "remote call failed");
    outcome.failures.push(ItemFailure {
        identifier: identifier.to_string(),
        action,
        message: err.to_string(),
    });
}
