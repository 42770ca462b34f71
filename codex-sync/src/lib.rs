//! # codex-sync
//!
//! Reconciles a local directory against a remote Codex content store.
//!
//! Call [`pipeline::plan`] to build both inventories and their diff, then
//! [`pipeline::apply`] to push the differences, or [`pipeline::run`] for both.

pub mod diff;
pub mod error;
pub mod executor;
pub mod http;
pub mod pipeline;
pub mod remote;
pub mod scanner;
pub mod store;
pub mod vcs;

pub use diff::{DiffCounts, DiffPartition};
pub use error::{RemoteError, SyncError};
pub use executor::{Action, ExecuteOptions, ExecutionOutcome, ItemFailure};
pub use http::HttpContentStore;
pub use pipeline::SyncPlan;
pub use remote::RemoteInventory;
pub use scanner::LocalInventory;
pub use store::{ContentPage, ContentStore, RetryPolicy};
pub use vcs::{GitClock, HistoryClock, NoHistory};
