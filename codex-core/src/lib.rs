//! Codex sync core library: domain types, timestamps, configuration, errors.
//!
//! - [`types`]: inventory records, diff entries and run counts
//! - [`time`]: timestamp normalisation shared by both inventories
//! - [`config`]: [`SyncOptions`] and option parsing
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use config::SyncOptions;
pub use error::ConfigError;
pub use types::{ContentId, DiffEntry, LocalRecord, RemoteRecord, SyncCounts};
