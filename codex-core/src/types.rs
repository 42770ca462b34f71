//! Domain types for a single reconciliation run.
//!
//! Records are built fresh on every run and never persisted. Identity on both
//! sides is the bare file name: `LocalRecord::identifier` joins against
//! `RemoteRecord::title`.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier assigned to a content item by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub String);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Inventory records
// ---------------------------------------------------------------------------

/// A validated item from the remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub content_id: ContentId,
    /// File name as stored remotely; the join key.
    pub title: String,
    /// `None` when the listing omitted the timestamp or it did not parse.
    pub modified_at: Option<DateTime<Utc>>,
}

/// A matched file under the local root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRecord {
    /// Base name of `path`; the join key.
    pub identifier: String,
    pub path: PathBuf,
    /// Resolved once at scan time.
    pub modified_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Diff entries
// ---------------------------------------------------------------------------

/// Classification of one identifier in the diff partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEntry {
    /// Present locally, absent remotely.
    ToAdd {
        identifier: String,
        path: PathBuf,
        local_modified_at: Option<DateTime<Utc>>,
    },
    /// Present on both sides and the local copy is strictly newer.
    ToUpdate {
        identifier: String,
        path: PathBuf,
        remote_id: ContentId,
        local_modified_at: Option<DateTime<Utc>>,
        remote_modified_at: Option<DateTime<Utc>>,
    },
    /// Present remotely, absent locally.
    ToDelete {
        identifier: String,
        remote_id: ContentId,
    },
    /// Present on both sides and the local copy is not newer.
    Unchanged {
        identifier: String,
        path: PathBuf,
        remote_id: ContentId,
    },
}

impl DiffEntry {
    pub fn identifier(&self) -> &str {
        match self {
            DiffEntry::ToAdd { identifier, .. }
            | DiffEntry::ToUpdate { identifier, .. }
            | DiffEntry::ToDelete { identifier, .. }
            | DiffEntry::Unchanged { identifier, .. } => identifier,
        }
    }
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Terminal counts exposed to the caller after a run.
///
/// Field names match the step outputs CI runners consume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCounts {
    pub files_added: usize,
    pub files_updated: usize,
    pub files_deleted: usize,
    pub files_unchanged: usize,
}

impl SyncCounts {
    /// `(name, value)` pairs in output order.
    pub fn as_pairs(&self) -> [(&'static str, usize); 4] {
        [
            ("files_added", self.files_added),
            ("files_updated", self.files_updated),
            ("files_deleted", self.files_deleted),
            ("files_unchanged", self.files_unchanged),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
